/// Customer registry: profiles, PINs and current balances keyed by customer code.
pub mod customer;

/// Deposit and withdrawal commands. A command only exists with a positive amount.
pub mod command;

/// Authentication strategies, chosen when a ledger is built.
pub mod auth;

/// Date source for transaction timestamps.
pub mod clock;

/// Ledger interface, plus "in memory" implementation.
/// Resolves, authenticates and validates every request before touching a balance,
/// and keeps the append-only transaction history.
pub mod ledger;

/// CSV operation scripts in, CSV reports out. Used by the binary and the
/// integration tests.
pub mod bin_utils;
