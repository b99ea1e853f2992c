//! Purchase-order costing.
//!
//! Derives what a stock purchase costs and what is owed to the distributor
//! after any up-front payment. Pure arithmetic, 2-decimal rounding, debt
//! clamped at zero so an over-payment settles the order instead of turning
//! the debt negative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reparto_shared::types::money::{clamp_non_negative, round_amount};

use super::error::OrderError;
use super::types::OrderStatus;

/// Commercial terms of a purchase order, expressed per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTerms {
    /// Number of units purchased (must be positive).
    pub quantity: i64,
    /// Price per unit charged by the distributor.
    pub distributor_cost: Decimal,
    /// Transport cost per unit.
    pub transport_cost: Decimal,
    /// Amount paid to the distributor up front.
    pub initial_payment: Decimal,
}

impl OrderTerms {
    /// Validates quantity, costs, and the initial payment.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the quantity is not positive or any amount
    /// is negative.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.quantity <= 0 {
            return Err(OrderError::NonPositiveQuantity(self.quantity));
        }
        if self.distributor_cost < Decimal::ZERO {
            return Err(OrderError::NegativeAmount {
                field: "distributor cost",
            });
        }
        if self.transport_cost < Decimal::ZERO {
            return Err(OrderError::NegativeAmount {
                field: "transport cost",
            });
        }
        if self.initial_payment < Decimal::ZERO {
            return Err(OrderError::NegativeAmount {
                field: "initial payment",
            });
        }
        Ok(())
    }

    /// Costs the order: per-unit cost with transport folded in, the order
    /// total, and the opening debt after the initial payment.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the terms fail validation.
    pub fn cost(&self) -> Result<OrderCosting, OrderError> {
        self.validate()?;

        let unit_cost = round_amount(self.distributor_cost + self.transport_cost);
        let total = round_amount(unit_cost * Decimal::from(self.quantity));
        let debt = clamp_non_negative(round_amount(total - self.initial_payment));
        let status = OrderStatus::from_amounts(total, debt);

        Ok(OrderCosting {
            unit_cost,
            total,
            debt,
            status,
        })
    }
}

/// The computed cost of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCosting {
    /// Per-unit cost including transport.
    pub unit_cost: Decimal,
    /// Total order cost.
    pub total: Decimal,
    /// Opening debt to the distributor.
    pub debt: Decimal,
    /// Opening settlement status.
    pub status: OrderStatus,
}
