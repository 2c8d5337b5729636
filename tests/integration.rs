use std::{cell::RefCell, rc::Rc, str::from_utf8};

use chrono::NaiveDate;
use pocket_ledger::{
    auth::AuthMode,
    bin_utils::{Outcome, Report, Service, ServiceError},
    clock::FixedClock,
    command::TransactionKind,
    customer::CustomerView,
    ledger::{LedgerConfig, LedgerError, Transaction},
};

const TEST_FILE: &str = include_str!("operations.csv");

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn clock() -> Box<FixedClock> {
    Box::new(FixedClock(date()))
}

fn tx(id: u64, customer_code: u32, kind: TransactionKind, amount: i64) -> Transaction {
    Transaction {
        id,
        customer_code,
        kind,
        amount,
        date: date(),
    }
}

#[test]
fn process_operations() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut output = Vec::new();
    let service = Service {
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        config: LedgerConfig::default(),
        clock: clock(),
        report: Report::All,
        outcome_printer: Box::new({
            let outcomes = outcomes.clone();
            move |line, outcome| outcomes.borrow_mut().push((line, outcome))
        }),
        error_printer: Box::new({
            let errors = errors.clone();
            move |line, err| errors.borrow_mut().push((line, err))
        }),
    };
    service.run().unwrap();

    let balance = |code, balance| Outcome::Balance { code, balance };
    assert_eq!(
        outcomes.borrow().as_slice(),
        &[
            (4, balance(101, 700)),
            (9, balance(202, 50)),
            (11, balance(101, 600)),
            (12, balance(101, 600)),
            (
                13,
                Outcome::Customer(CustomerView {
                    code: 101,
                    name: "Jane Doe".to_string(),
                    date_of_birth: "12/05/1985".to_string(),
                    balance: 600,
                })
            ),
            (
                14,
                Outcome::History {
                    code: 101,
                    transactions: vec![
                        tx(1, 101, TransactionKind::Deposit, 200),
                        tx(3, 101, TransactionKind::Withdraw, 100),
                    ],
                }
            ),
            (
                18,
                Outcome::History {
                    code: 202,
                    transactions: vec![tx(2, 202, TransactionKind::Deposit, 50)],
                }
            ),
        ]
    );

    let errors = errors.borrow();
    let lines: Vec<_> = errors.iter().map(|(line, _)| *line).collect();
    assert_eq!(lines, vec![5, 6, 7, 8, 10, 15, 16, 17]);
    assert!(matches!(
        errors[0].1,
        ServiceError::Ledger(LedgerError::InsufficientFunds {
            balance: 700,
            requested: 1000
        })
    ));
    assert!(matches!(
        errors[1].1,
        ServiceError::Ledger(LedgerError::InvalidCredential { code: 101 })
    ));
    assert!(matches!(
        errors[2].1,
        ServiceError::Ledger(LedgerError::CustomerNotFound { code: 999 })
    ));
    assert!(matches!(
        errors[3].1,
        ServiceError::Ledger(LedgerError::DuplicateCode { code: 101 })
    ));
    assert!(matches!(
        errors[4].1,
        ServiceError::MissingField { field: "amount", .. }
    ));
    assert!(matches!(
        errors[5].1,
        ServiceError::Ledger(LedgerError::CustomerNotFound { code: 999 })
    ));
    // a gated ledger refuses customers without a PIN
    assert!(matches!(
        errors[6].1,
        ServiceError::Ledger(LedgerError::InvalidProfile { field: "pin" })
    ));
    // an existing code is reported even when the other fields are invalid
    assert!(matches!(
        errors[7].1,
        ServiceError::Ledger(LedgerError::DuplicateCode { code: 101 })
    ));

    assert_eq!(
        from_utf8(&output).unwrap(),
        "code,name,dob,balance\n\
         101,Jane Doe,12/05/1985,600\n\
         202,John Roe,01/01/1970,50\n\
         \n\
         id,customer,type,amount,date\n\
         1,101,deposit,200,15/03/2024\n\
         2,202,deposit,50,15/03/2024\n\
         3,101,withdraw,100,15/03/2024\n"
    );
}

#[test]
fn unauthenticated_mode_ignores_pins() {
    let script = "op,customer,amount,pin,name,dob\n\
                  register,1,10,,Ann,03/03/2003\n\
                  deposit,1,5\n\
                  withdraw,1,3,whatever\n";
    let mut output = Vec::new();
    let service = Service {
        input: script.as_bytes(),
        output: &mut output,
        config: LedgerConfig {
            auth: AuthMode::Disabled,
        },
        clock: clock(),
        report: Report::Customers,
        outcome_printer: Box::new(|_, _| {}),
        error_printer: Box::new(|line, err| panic!("unexpected error at line {line}: {err}")),
    };
    service.run().unwrap();
    assert_eq!(
        from_utf8(&output).unwrap(),
        "code,name,dob,balance\n1,Ann,03/03/2003,12\n"
    );
}
