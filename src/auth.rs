use crate::customer::Pin;

/// Selects which [`Authenticator`] a ledger is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Every operation must present the customer's PIN.
    #[default]
    Pin,
    /// Operations are accepted without a PIN.
    Disabled,
}

impl AuthMode {
    pub fn authenticator(self) -> Box<dyn Authenticator> {
        match self {
            AuthMode::Pin => Box::new(PinAuthenticator),
            AuthMode::Disabled => Box::new(NoAuthentication),
        }
    }
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, stored: Option<&Pin>, supplied: Option<&str>) -> bool;

    /// Whether a customer must be registered with a PIN to be usable at all.
    fn requires_pin(&self) -> bool;
}

/// Exact match against the stored PIN. A customer without a PIN never matches.
#[derive(Debug, Default)]
pub struct PinAuthenticator;

impl Authenticator for PinAuthenticator {
    fn authenticate(&self, stored: Option<&Pin>, supplied: Option<&str>) -> bool {
        match (stored, supplied) {
            (Some(stored), Some(supplied)) => stored.matches(supplied),
            _ => false,
        }
    }

    fn requires_pin(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
pub struct NoAuthentication;

impl Authenticator for NoAuthentication {
    fn authenticate(&self, _stored: Option<&Pin>, _supplied: Option<&str>) -> bool {
        true
    }

    fn requires_pin(&self) -> bool {
        false
    }
}
