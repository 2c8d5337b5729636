use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use thiserror::Error;

use crate::ledger::Balance;

pub type CustomerCode = u32;

/// Shared secret used to authorize operations. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }

    pub fn matches(&self, supplied: &str) -> bool {
        self.0 == supplied
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(***)")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Customer {code} is already registered")]
    DuplicateCode { code: CustomerCode },
    #[error("Customer {code} not found")]
    NotFound { code: CustomerCode },
    #[error("Insufficient funds for customer {code}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        code: CustomerCode,
        balance: Balance,
        requested: Balance,
    },
    #[error("Invalid amount: {0}")]
    InvalidAmount(Balance),
    #[error("Customer {field} must not be empty")]
    EmptyProfileField { field: &'static str },
}

/// Registration request, as supplied by the caller.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub code: CustomerCode,
    pub name: String,
    pub date_of_birth: String,
    pub initial_balance: Balance,
    pub pin: Option<Pin>,
}

#[derive(Debug, Clone)]
pub struct Customer {
    code: CustomerCode,
    name: String,
    date_of_birth: String,
    balance: Balance,
    pin: Option<Pin>,
}

/// Read-only copy of a customer record, without the PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerView {
    pub code: CustomerCode,
    pub name: String,
    pub date_of_birth: String,
    pub balance: Balance,
}

impl Customer {
    pub fn balance(&self) -> Balance {
        self.balance
    }

    pub fn pin(&self) -> Option<&Pin> {
        self.pin.as_ref()
    }

    pub fn view(&self) -> CustomerView {
        CustomerView {
            code: self.code,
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            balance: self.balance,
        }
    }
}

/// Customers keyed by code. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct CustomerRegistry {
    customers: HashMap<CustomerCode, Customer>,
    order: Vec<CustomerCode>,
}

impl CustomerRegistry {
    /// Inserts a new customer. A duplicate code is reported before any field
    /// validation, and nothing is stored on error.
    pub fn register(
        &mut self,
        new: NewCustomer,
        require_pin: bool,
    ) -> Result<CustomerView, RegistryError> {
        let code = new.code;
        let Entry::Vacant(entry) = self.customers.entry(code) else {
            return Err(RegistryError::DuplicateCode { code });
        };
        if new.initial_balance < 0 {
            return Err(RegistryError::InvalidAmount(new.initial_balance));
        }
        if new.name.trim().is_empty() {
            return Err(RegistryError::EmptyProfileField { field: "name" });
        }
        if new.date_of_birth.trim().is_empty() {
            return Err(RegistryError::EmptyProfileField {
                field: "date of birth",
            });
        }
        if require_pin && new.pin.is_none() {
            return Err(RegistryError::EmptyProfileField { field: "pin" });
        }
        let view = entry
            .insert(Customer {
                code,
                name: new.name,
                date_of_birth: new.date_of_birth,
                balance: new.initial_balance,
                pin: new.pin,
            })
            .view();
        self.order.push(code);
        Ok(view)
    }

    pub fn lookup(&self, code: CustomerCode) -> Option<CustomerView> {
        self.customers.get(&code).map(Customer::view)
    }

    /// Full record, PIN included. Only the ledger engine resolves through this.
    pub(crate) fn resolve(&self, code: CustomerCode) -> Option<&Customer> {
        self.customers.get(&code)
    }

    /// Adds `delta` to the stored balance. On error the balance is untouched.
    pub fn apply_balance_delta(
        &mut self,
        code: CustomerCode,
        delta: Balance,
    ) -> Result<Balance, RegistryError> {
        let customer = self
            .customers
            .get_mut(&code)
            .ok_or(RegistryError::NotFound { code })?;
        let new_balance = customer
            .balance
            .checked_add(delta)
            .ok_or(RegistryError::InvalidAmount(delta))?;
        if new_balance < 0 {
            return Err(RegistryError::InsufficientFunds {
                code,
                balance: customer.balance,
                requested: delta.saturating_neg(),
            });
        }
        customer.balance = new_balance;
        Ok(new_balance)
    }

    pub fn list_all(&self) -> impl Iterator<Item = CustomerView> + Clone + '_ {
        self.order
            .iter()
            .filter_map(|code| self.customers.get(code))
            .map(Customer::view)
    }
}
