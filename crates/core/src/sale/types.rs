//! Sale domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reparto_shared::types::money::{clamp_non_negative, round_amount};
use reparto_shared::types::{ClientId, OrderId, SaleId};

use crate::distribution::{Distribution, DistributionFlag, SaleTerms};

/// Payment state of a sale. Moves forward only through payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Pending,
    /// Partially paid.
    Partial,
    /// Fully paid.
    Complete,
}

impl PaymentStatus {
    /// Derives the status from the sale total and the cumulative paid amount.
    #[must_use]
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            Self::Pending
        } else if paid < total {
            Self::Partial
        } else {
            Self::Complete
        }
    }

    /// Returns true if nothing has been paid.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the sale is fully paid.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A sale with its computed distribution and payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// The sale ID.
    pub id: SaleId,
    /// The buying client.
    pub client_id: ClientId,
    /// Purchase order the sold units came from, if tracked.
    pub order_id: Option<OrderId>,
    /// Units sold.
    pub quantity: i64,
    /// Sale price per unit.
    pub unit_price: Decimal,
    /// Cost price per unit.
    pub unit_cost: Decimal,
    /// Freight price per unit.
    pub unit_freight: Decimal,
    /// Whether freight is routed to its own account.
    pub apply_freight: bool,
    /// The computed three-way split of the total.
    pub distribution: Distribution,
    /// Cumulative amount paid.
    pub paid: Decimal,
    /// Unpaid remainder. Never negative.
    pub remaining: Decimal,
    /// Derived payment status.
    pub status: PaymentStatus,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// The commercial terms this sale was computed from.
    #[must_use]
    pub fn terms(&self) -> SaleTerms {
        SaleTerms {
            quantity: self.quantity,
            unit_price: self.unit_price,
            unit_cost: self.unit_cost,
            unit_freight: self.unit_freight,
            apply_freight: self.apply_freight,
        }
    }

    /// Recomputes paid, remaining, and status for a new cumulative paid
    /// total. The remainder clamps at zero on over-payment.
    pub fn settle(&mut self, new_paid_total: Decimal) {
        self.paid = round_amount(new_paid_total);
        self.remaining = clamp_non_negative(self.distribution.total - self.paid);
        self.status = PaymentStatus::from_amounts(self.distribution.total, self.paid);
        self.updated_at = Utc::now();
    }
}

/// Input for creating a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleInput {
    /// The buying client.
    pub client_id: ClientId,
    /// Purchase order to draw stock from, if any.
    pub order_id: Option<OrderId>,
    /// Units sold.
    pub quantity: i64,
    /// Sale price per unit.
    pub unit_price: Decimal,
    /// Cost price per unit.
    pub unit_cost: Decimal,
    /// Freight price per unit.
    pub unit_freight: Decimal,
    /// Whether freight is routed to its own account.
    pub apply_freight: bool,
    /// Amount paid at creation time.
    pub initial_payment: Decimal,
    /// Optional free-form notes.
    pub notes: Option<String>,
}

impl CreateSaleInput {
    /// The commercial terms to distribute.
    #[must_use]
    pub fn terms(&self) -> SaleTerms {
        SaleTerms {
            quantity: self.quantity,
            unit_price: self.unit_price,
            unit_cost: self.unit_cost,
            unit_freight: self.unit_freight,
            apply_freight: self.apply_freight,
        }
    }
}

/// Result of creating a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSaleOutput {
    /// The new sale's ID.
    pub sale_id: SaleId,
    /// The computed distribution.
    pub distribution: Distribution,
    /// Payment status after the initial payment.
    pub status: PaymentStatus,
    /// Non-fatal integrity flags raised during distribution.
    pub flags: Vec<DistributionFlag>,
}

/// Result of registering a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutput {
    /// The sale the payment was applied to.
    pub sale_id: SaleId,
    /// New cumulative paid amount.
    pub paid: Decimal,
    /// New unpaid remainder.
    pub remaining: Decimal,
    /// New payment status.
    pub status: PaymentStatus,
}
