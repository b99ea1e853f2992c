//! Ledger accounting for sale distributions.
//!
//! This module implements the bookkeeping half of the engine:
//! - Account, client and movement domain types
//! - Balance deltas with inflow/outflow history tracking
//! - An all-or-nothing unit of work with compensating rollback
//! - The ledger service that posts, pays and reverses sales
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;
pub mod unit_of_work;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    Account, AccountRole, BalanceDelta, Client, DistributionAccounts, Movement, MovementDirection,
    MovementKind,
};
pub use unit_of_work::{LedgerOp, UnitOfWork};
