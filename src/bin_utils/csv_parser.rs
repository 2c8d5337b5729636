use std::io::Read;

use crate::{customer::CustomerCode, ledger::Balance};
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Register,
    Deposit,
    Withdraw,
    Balance,
    View,
    History,
}

/// One line of an operation script. For `register`, `amount` is the initial balance.
#[derive(Debug, Deserialize)]
pub struct Operation {
    pub op: OperationKind,
    pub customer: CustomerCode,
    pub amount: Option<Balance>,
    pub pin: Option<String>,
    pub name: Option<String>,
    pub dob: Option<String>,
}

/// Parses an operation script in CSV format, yielding each row with its line number.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Operation, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
