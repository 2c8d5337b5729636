use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::Balance;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("deposit"),
            TransactionKind::Withdraw => f.write_str("withdraw"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount must be positive for {kind:?}, got {amount}")]
    NonPositiveAmount { kind: TransactionKind, amount: Balance },
}

/// A balance-mutating request whose amount is known to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCommand {
    kind: TransactionKind,
    amount: Balance,
}

impl TransactionCommand {
    pub fn parse(kind: TransactionKind, amount: Balance) -> Result<Self, CommandError> {
        if amount > 0 {
            Ok(Self { kind, amount })
        } else {
            Err(CommandError::NonPositiveAmount { kind, amount })
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Balance {
        self.amount
    }

    /// Signed change this command makes to the balance.
    pub fn delta(&self) -> Balance {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            // amount > 0, so negation cannot overflow
            TransactionKind::Withdraw => -self.amount,
        }
    }
}
