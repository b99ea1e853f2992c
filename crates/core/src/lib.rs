//! Core engine for Reparto.
//!
//! This crate contains the sale distribution and ledger-consistency engine,
//! pure business logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `distribution` - Splitting a sale total into cost, freight, and profit
//! - `ledger` - Account movements applied as an atomic unit of work
//! - `sale` - Sale lifecycle orchestration (create, pay, delete)
//! - `order` - Purchase-order costing and distributor debt
//! - `store` - Storage port and the in-memory reference adapter

pub mod distribution;
pub mod ledger;
pub mod order;
pub mod sale;
pub mod store;
