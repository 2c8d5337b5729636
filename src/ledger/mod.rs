use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    auth::AuthMode,
    command::{CommandError, TransactionKind},
    customer::{CustomerCode, NewCustomer, RegistryError},
};

pub mod in_memory_ledger;

/// Amount of money in the smallest currency unit.
pub type Balance = i64;

pub type TransactionId = u64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Customer {code} is already registered")]
    DuplicateCode { code: CustomerCode },
    #[error("Customer {code} not found")]
    CustomerNotFound { code: CustomerCode },
    #[error("Invalid credential for customer {code}")]
    InvalidCredential { code: CustomerCode },
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Balance },
    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Balance, requested: Balance },
    #[error("Invalid customer profile: {field} must not be empty")]
    InvalidProfile { field: &'static str },
}

impl From<RegistryError> for LedgerError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateCode { code } => Self::DuplicateCode { code },
            RegistryError::NotFound { code } => Self::CustomerNotFound { code },
            RegistryError::InsufficientFunds {
                balance, requested, ..
            } => Self::InsufficientFunds { balance, requested },
            RegistryError::InvalidAmount(amount) => Self::InvalidAmount { amount },
            RegistryError::EmptyProfileField { field } => Self::InvalidProfile { field },
        }
    }
}

impl From<CommandError> for LedgerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::NonPositiveAmount { amount, .. } => Self::InvalidAmount { amount },
        }
    }
}

/// Immutable record of one applied deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: TransactionId,
    pub customer_code: CustomerCode,
    pub kind: TransactionKind,
    pub amount: Balance,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerConfig {
    pub auth: AuthMode,
}

/// Authenticated balance operations. `pin` is ignored when authentication is disabled.
pub trait Ledger {
    fn register(&mut self, customer: NewCustomer) -> Result<(), LedgerError>;

    fn deposit(
        &mut self,
        code: CustomerCode,
        amount: Balance,
        pin: Option<&str>,
    ) -> Result<Balance, LedgerError>;

    fn withdraw(
        &mut self,
        code: CustomerCode,
        amount: Balance,
        pin: Option<&str>,
    ) -> Result<Balance, LedgerError>;

    fn balance_of(&self, code: CustomerCode, pin: Option<&str>) -> Result<Balance, LedgerError>;
}
