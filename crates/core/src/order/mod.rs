//! Purchase orders: stock bought from a distributor on credit.
//!
//! - [`costing`]: pure derivation of unit cost, order total, and opening debt
//! - [`service`]: order creation and distributor debt settlement
//! - [`types`]: the order record and its status lifecycle
//!
//! Orders feed the sale side only through their stock counter; no ledger
//! accounts move when an order is created or settled.

pub mod costing;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod costing_props;

pub use costing::{OrderCosting, OrderTerms};
pub use error::OrderError;
pub use service::OrderService;
pub use types::{CreateOrderInput, OrderStatus, PurchaseOrder};
