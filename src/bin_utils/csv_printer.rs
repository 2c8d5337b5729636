use std::io::Write;

use crate::{
    command::TransactionKind,
    customer::{CustomerCode, CustomerView},
    ledger::{Balance, Transaction, TransactionId},
};
use csv::Writer;
use serde::Serialize;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Serialize)]
pub struct CustomerRow {
    pub code: CustomerCode,
    pub name: String,
    pub dob: String,
    pub balance: Balance,
}

impl From<CustomerView> for CustomerRow {
    fn from(view: CustomerView) -> Self {
        Self {
            code: view.code,
            name: view.name,
            dob: view.date_of_birth,
            balance: view.balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub customer: CustomerCode,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Balance,
    pub date: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            customer: tx.customer_code,
            kind: tx.kind,
            amount: tx.amount,
            date: tx.date.format(DATE_FORMAT).to_string(),
        }
    }
}

pub fn print_rows<W, T>(output: &mut W, rows: impl Iterator<Item = T>) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    let mut writer = Writer::from_writer(output);
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn print_transactions() {
        let tx = Transaction {
            id: 4,
            customer_code: 101,
            kind: TransactionKind::Withdraw,
            amount: 250,
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        };
        let mut output = Vec::new();
        print_rows(&mut output, std::iter::once(TransactionRow::from(&tx))).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,customer,type,amount,date\n4,101,withdraw,250,09/01/2024\n"
        );
    }
}
