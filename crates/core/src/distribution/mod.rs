//! Sale distribution logic.
//!
//! This module implements the three-way split of a sale total:
//! - Sale terms validation
//! - Total, cost, freight, and profit computation
//! - Proportional portions for partial payments
//! - Integrity flags for rounding drift and loss sales
//! - Error types for invalid terms

pub mod calculator;
pub mod error;

#[cfg(test)]
mod calculator_props;

pub use calculator::{Distribution, DistributionFlag, PaidPortion, SaleTerms};
pub use error::DistributionError;
