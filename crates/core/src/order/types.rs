//! Purchase-order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reparto_shared::types::OrderId;

use super::costing::OrderTerms;

/// Settlement status of the debt owed to the distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Nothing paid yet.
    Pending,
    /// Some debt settled, some outstanding.
    Partial,
    /// Debt fully settled.
    Paid,
}

impl OrderStatus {
    /// Derives the status from the order total and the outstanding debt.
    #[must_use]
    pub fn from_amounts(total: Decimal, debt: Decimal) -> Self {
        if debt <= Decimal::ZERO {
            Self::Paid
        } else if debt < total {
            Self::Partial
        } else {
            Self::Pending
        }
    }

    /// Returns true if the distributor has been fully paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A purchase order: stock bought from a distributor on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// The order ID.
    pub id: OrderId,
    /// Units purchased.
    pub quantity: i64,
    /// Units not yet consumed by sales.
    pub stock_remaining: i64,
    /// Per-unit cost including transport.
    pub unit_cost: Decimal,
    /// Total order cost.
    pub total_cost: Decimal,
    /// Outstanding debt to the distributor. Never negative.
    pub debt: Decimal,
    /// Settlement status.
    pub status: OrderStatus,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Returns true if any units remain unsold.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.stock_remaining > 0
    }
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    /// Units purchased.
    pub quantity: i64,
    /// Per-unit price charged by the distributor.
    pub distributor_cost: Decimal,
    /// Per-unit transport cost.
    pub transport_cost: Decimal,
    /// Amount paid to the distributor up front.
    pub initial_payment: Decimal,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

impl CreateOrderInput {
    /// The commercial terms to cost.
    #[must_use]
    pub fn terms(&self) -> OrderTerms {
        OrderTerms {
            quantity: self.quantity,
            distributor_cost: self.distributor_cost,
            transport_cost: self.transport_cost,
            initial_payment: self.initial_payment,
        }
    }
}
