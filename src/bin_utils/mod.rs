//! Bootstraps [`crate::ledger`] for the binary: reads an operation script,
//! feeds it to an [`InMemoryLedger`] and prints the resulting reports.

use std::io::{Read, Write};

use crate::{
    clock::Clock,
    customer::{CustomerCode, CustomerView, NewCustomer, Pin},
    ledger::{
        Balance, Ledger, LedgerConfig, LedgerError, Transaction, in_memory_ledger::InMemoryLedger,
    },
};
use anyhow::Result;
use clap::ValueEnum;
use csv_parser::{CsvOperationParser, Operation, OperationKind};
use csv_printer::{CustomerRow, TransactionRow, print_rows};
use thiserror::Error;
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Malformed operation: {0}")]
    Parse(#[from] csv::Error),
    #[error("Field `{field}` is required for {op:?}")]
    MissingField {
        op: OperationKind,
        field: &'static str,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What a successful script line produced, other than a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Balance {
        code: CustomerCode,
        balance: Balance,
    },
    Customer(CustomerView),
    History {
        code: CustomerCode,
        transactions: Vec<Transaction>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Report {
    Customers,
    Transactions,
    #[default]
    All,
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: LedgerConfig,
    pub clock: Box<dyn Clock>,
    pub report: Report,
    pub outcome_printer: Box<dyn FnMut(u64, Outcome)>,
    pub error_printer: Box<dyn FnMut(u64, ServiceError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);

        let mut ledger = InMemoryLedger::with_config(self.config, self.clock);

        for (line, row) in parser {
            let outcome = row
                .map_err(ServiceError::from)
                .and_then(|op| apply_operation(&mut ledger, op));
            match outcome {
                Ok(Some(outcome)) => (self.outcome_printer)(line, outcome),
                Ok(None) => {}
                Err(err) => (self.error_printer)(line, err),
            }
        }

        if matches!(self.report, Report::Customers | Report::All) {
            print_rows(&mut *self.output, ledger.customers().map(CustomerRow::from))?;
        }
        if self.report == Report::All {
            writeln!(self.output)?;
        }
        if matches!(self.report, Report::Transactions | Report::All) {
            print_rows(&mut *self.output, ledger.all_history().map(TransactionRow::from))?;
        }
        Ok(())
    }
}

fn apply_operation(
    ledger: &mut InMemoryLedger,
    op: Operation,
) -> Result<Option<Outcome>, ServiceError> {
    let code = op.customer;
    let pin = op.pin.as_deref();
    let required = |value: Option<Balance>, field| {
        value.ok_or(ServiceError::MissingField { op: op.op, field })
    };
    let balance = match op.op {
        OperationKind::Register => {
            ledger.register(NewCustomer {
                code,
                name: op.name.clone().unwrap_or_default(),
                date_of_birth: op.dob.clone().unwrap_or_default(),
                initial_balance: op.amount.unwrap_or_default(),
                pin: op.pin.clone().map(Pin::new),
            })?;
            return Ok(None);
        }
        OperationKind::View => {
            let view = ledger
                .lookup(code)
                .ok_or(LedgerError::CustomerNotFound { code })?;
            return Ok(Some(Outcome::Customer(view)));
        }
        OperationKind::History => {
            if ledger.lookup(code).is_none() {
                return Err(LedgerError::CustomerNotFound { code }.into());
            }
            let transactions = ledger.history_of(code).cloned().collect();
            return Ok(Some(Outcome::History { code, transactions }));
        }
        OperationKind::Deposit => ledger.deposit(code, required(op.amount, "amount")?, pin)?,
        OperationKind::Withdraw => ledger.withdraw(code, required(op.amount, "amount")?, pin)?,
        OperationKind::Balance => ledger.balance_of(code, pin)?,
    };
    Ok(Some(Outcome::Balance { code, balance }))
}
