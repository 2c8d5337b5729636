use tracing::{debug, info};

use crate::{
    auth::Authenticator,
    clock::{Clock, SystemClock},
    command::{TransactionCommand, TransactionKind},
    customer::{Customer, CustomerCode, CustomerRegistry, CustomerView, NewCustomer},
};

use super::{Balance, Ledger, LedgerConfig, LedgerError, Transaction, TransactionId};

/// Single-writer ledger: every operation takes `&mut self` and runs to completion,
/// so the resolve/authenticate/validate/apply/record steps never interleave.
pub struct InMemoryLedger {
    registry: CustomerRegistry,
    history: Vec<Transaction>,
    last_tx_id: TransactionId,
    authenticator: Box<dyn Authenticator>,
    clock: Box<dyn Clock>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default(), SystemClock)
    }

    pub fn with_config(config: LedgerConfig, clock: impl Clock + 'static) -> Self {
        Self {
            registry: CustomerRegistry::default(),
            history: Vec::new(),
            last_tx_id: 0,
            authenticator: config.auth.authenticator(),
            clock: Box::new(clock),
        }
    }

    pub fn lookup(&self, code: CustomerCode) -> Option<CustomerView> {
        self.registry.lookup(code)
    }

    pub fn customers(&self) -> impl Iterator<Item = CustomerView> + Clone + '_ {
        self.registry.list_all()
    }

    /// Transactions of one customer, oldest first.
    pub fn history_of(
        &self,
        code: CustomerCode,
    ) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        self.history
            .iter()
            .filter(move |tx| tx.customer_code == code)
    }

    /// Whole ledger, oldest first.
    pub fn all_history(&self) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        self.history.iter()
    }

    fn authorize(&self, code: CustomerCode, pin: Option<&str>) -> Result<&Customer, LedgerError> {
        let Some(customer) = self.registry.resolve(code) else {
            debug!(code, "customer not found");
            return Err(LedgerError::CustomerNotFound { code });
        };
        if !self.authenticator.authenticate(customer.pin(), pin) {
            debug!(code, "invalid credential");
            return Err(LedgerError::InvalidCredential { code });
        }
        Ok(customer)
    }

    fn execute(
        &mut self,
        code: CustomerCode,
        kind: TransactionKind,
        amount: Balance,
        pin: Option<&str>,
    ) -> Result<Balance, LedgerError> {
        let balance = self.authorize(code, pin)?.balance();
        let command = TransactionCommand::parse(kind, amount).inspect_err(|err| {
            debug!(code, %err, "rejected command");
        })?;
        if kind == TransactionKind::Withdraw && amount > balance {
            debug!(code, balance, amount, "insufficient funds");
            return Err(LedgerError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        let new_balance = self
            .registry
            .apply_balance_delta(code, command.delta())
            .inspect_err(|err| debug!(code, %err, "balance update rejected"))?;

        // Nothing below can fail: the record always accompanies the balance change.
        self.last_tx_id += 1;
        let tx = Transaction {
            id: self.last_tx_id,
            customer_code: code,
            kind: command.kind(),
            amount: command.amount(),
            date: self.clock.today(),
        };
        info!(tx_id = tx.id, code, %kind, amount, new_balance, "transaction recorded");
        self.history.push(tx);
        Ok(new_balance)
    }
}

impl Ledger for InMemoryLedger {
    fn register(&mut self, customer: NewCustomer) -> Result<(), LedgerError> {
        let code = customer.code;
        match self
            .registry
            .register(customer, self.authenticator.requires_pin())
        {
            Ok(view) => {
                info!(code, balance = view.balance, "customer registered");
                Ok(())
            }
            Err(err) => {
                debug!(code, %err, "registration rejected");
                Err(err.into())
            }
        }
    }

    fn deposit(
        &mut self,
        code: CustomerCode,
        amount: Balance,
        pin: Option<&str>,
    ) -> Result<Balance, LedgerError> {
        self.execute(code, TransactionKind::Deposit, amount, pin)
    }

    fn withdraw(
        &mut self,
        code: CustomerCode,
        amount: Balance,
        pin: Option<&str>,
    ) -> Result<Balance, LedgerError> {
        self.execute(code, TransactionKind::Withdraw, amount, pin)
    }

    fn balance_of(&self, code: CustomerCode, pin: Option<&str>) -> Result<Balance, LedgerError> {
        self.authorize(code, pin).map(Customer::balance)
    }
}
