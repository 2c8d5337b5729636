use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use pocket_ledger::{
    auth::AuthMode,
    bin_utils::{Outcome, Report, Service, ServiceError},
    clock::SystemClock,
    ledger::LedgerConfig,
};
use tracing_subscriber::EnvFilter;

/// Runs a CSV operation script against an in-memory customer ledger.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Script with header `op,customer,amount,pin,name,dob`
    script: PathBuf,
    /// Accept operations without checking the customer's PIN
    #[arg(long)]
    no_auth: bool,
    /// Which report to print once the script has run
    #[arg(long, value_enum, default_value_t = Report::All)]
    report: Report,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file = File::open(&cli.script)
        .with_context(|| format!("Failed to open `{}`", cli.script.display()))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        config: LedgerConfig {
            auth: if cli.no_auth {
                AuthMode::Disabled
            } else {
                AuthMode::Pin
            },
        },
        clock: Box::new(SystemClock),
        report: cli.report,
        outcome_printer: Box::new(|_, outcome| match outcome {
            Outcome::Balance { code, balance } => {
                eprintln!("Customer {code} balance: {balance}")
            }
            Outcome::Customer(view) => eprintln!(
                "Code: {}, Name: {}, DOB: {}, Balance: {}",
                view.code, view.name, view.date_of_birth, view.balance
            ),
            Outcome::History { code, transactions } if transactions.is_empty() => {
                eprintln!("No transactions found for customer {code}")
            }
            Outcome::History { transactions, .. } => {
                for tx in transactions {
                    eprintln!(
                        "ID: {}, Type: {}, Amount: {}, Date: {}",
                        tx.id,
                        tx.kind,
                        tx.amount,
                        tx.date.format("%d/%m/%Y")
                    )
                }
            }
        }),
        error_printer: Box::new(|line, err| match err {
            ServiceError::Parse(_) | ServiceError::MissingField { .. } => {
                eprintln!("Error at line {line}: {err}")
            }
            ServiceError::Ledger(err) => eprintln!("Rejected at line {line}: {err}"),
        }),
    };
    service.run()
}
