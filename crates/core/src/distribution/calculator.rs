//! Sale distribution calculator.
//!
//! Splits a sale total into three amounts that together account for every
//! cent of revenue: cost recovery, freight, and profit. All computation is
//! pure; amounts are rounded to 2 decimal places at the end of each
//! derivation. The parts must re-sum to the total within one cent, and a
//! larger gap is surfaced as a flag on the result, never as an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use reparto_shared::types::money::{margin_percent, round_amount, within_tolerance};

use super::error::DistributionError;

/// Commercial terms of a sale, expressed per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTerms {
    /// Number of units sold (must be positive).
    pub quantity: i64,
    /// Sale price per unit.
    pub unit_price: Decimal,
    /// Cost price per unit.
    pub unit_cost: Decimal,
    /// Freight price per unit.
    pub unit_freight: Decimal,
    /// Whether freight is routed to its own account.
    pub apply_freight: bool,
}

impl SaleTerms {
    /// Validates quantity and unit prices.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError` if the quantity is not positive or any
    /// unit price is negative.
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.quantity <= 0 {
            return Err(DistributionError::NonPositiveQuantity(self.quantity));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(DistributionError::NegativePrice {
                field: "unit sale price",
            });
        }
        if self.unit_cost < Decimal::ZERO {
            return Err(DistributionError::NegativePrice {
                field: "unit cost price",
            });
        }
        if self.unit_freight < Decimal::ZERO {
            return Err(DistributionError::NegativePrice {
                field: "unit freight price",
            });
        }
        Ok(())
    }

    /// The freight amount per unit that actually participates in the split.
    ///
    /// Zero when freight is not applied, regardless of the freight price.
    #[must_use]
    pub fn effective_freight_unit(&self) -> Decimal {
        if self.apply_freight {
            self.unit_freight
        } else {
            Decimal::ZERO
        }
    }

    /// Computes the distribution of this sale's total.
    ///
    /// Freight is subtracted from profit exactly once, and only when it is
    /// also routed to the freight account. Disabling freight is equivalent
    /// to a zero freight price.
    ///
    /// A negative profit (sale priced below cost plus freight) is computed
    /// and flagged, never rejected.
    ///
    /// # Errors
    ///
    /// Returns `DistributionError` if the terms fail validation.
    pub fn distribute(&self) -> Result<Distribution, DistributionError> {
        self.validate()?;

        let quantity = Decimal::from(self.quantity);
        let freight_unit = self.effective_freight_unit();

        let total = round_amount(self.unit_price * quantity);
        let cost = round_amount(self.unit_cost * quantity);
        let freight = round_amount(freight_unit * quantity);
        let profit = round_amount((self.unit_price - self.unit_cost - freight_unit) * quantity);

        let distribution = Distribution {
            total,
            cost,
            freight,
            profit,
            margin_percent: margin_percent(profit, total),
        };

        if distribution.has_rounding_gap() {
            warn!(
                total = %distribution.total,
                parts_sum = %distribution.parts_sum(),
                gap = %distribution.rounding_gap(),
                "distribution parts drifted beyond one cent of the total"
            );
        }
        if distribution.is_loss() {
            warn!(
                total = %distribution.total,
                profit = %distribution.profit,
                "sale priced below cost plus freight"
            );
        }

        Ok(distribution)
    }
}

/// The three-way split of a sale total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Total sale amount (unit price times quantity).
    pub total: Decimal,
    /// Cost-recovery share.
    pub cost: Decimal,
    /// Freight share. Zero when freight is not applied.
    pub freight: Decimal,
    /// Profit share. Negative for a sale priced below cost plus freight.
    pub profit: Decimal,
    /// Profit as a percentage of the total.
    pub margin_percent: Decimal,
}

impl Distribution {
    /// Sum of the three distributed parts.
    #[must_use]
    pub fn parts_sum(&self) -> Decimal {
        self.cost + self.freight + self.profit
    }

    /// Difference between the total and the sum of its parts.
    #[must_use]
    pub fn rounding_gap(&self) -> Decimal {
        self.total - self.parts_sum()
    }

    /// Returns true if the parts drifted more than one cent from the total.
    #[must_use]
    pub fn has_rounding_gap(&self) -> bool {
        !within_tolerance(self.total, self.parts_sum())
    }

    /// Returns true if the sale is priced below cost plus freight.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.profit < Decimal::ZERO
    }

    /// Non-fatal integrity flags for this distribution.
    #[must_use]
    pub fn flags(&self) -> Vec<DistributionFlag> {
        let mut flags = Vec::new();
        if self.has_rounding_gap() {
            flags.push(DistributionFlag::RoundingGap);
        }
        if self.is_loss() {
            flags.push(DistributionFlag::NegativeProfit);
        }
        flags
    }

    /// The share of each distributed amount covered by a payment.
    ///
    /// Each amount is scaled by `paid / total` and rounded independently.
    /// A zero or negative total yields a zero portion; a paid amount above
    /// the total yields a proportion above one.
    #[must_use]
    pub fn portion(&self, paid: Decimal) -> PaidPortion {
        let proportion = if self.total > Decimal::ZERO {
            paid / self.total
        } else {
            Decimal::ZERO
        };

        PaidPortion {
            proportion,
            cost: round_amount(self.cost * proportion),
            freight: round_amount(self.freight * proportion),
            profit: round_amount(self.profit * proportion),
        }
    }
}

/// Non-fatal conditions attached to a successful distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionFlag {
    /// The parts re-sum more than one cent away from the total.
    RoundingGap,
    /// Profit is negative.
    NegativeProfit,
}

/// Share of each distributed amount covered by a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaidPortion {
    /// Ratio of the paid amount to the sale total. May exceed one.
    pub proportion: Decimal,
    /// Cost-recovery share of the payment.
    pub cost: Decimal,
    /// Freight share of the payment.
    pub freight: Decimal,
    /// Profit share of the payment.
    pub profit: Decimal,
}

impl PaidPortion {
    /// Sum of the three portion amounts.
    #[must_use]
    pub fn sum(&self) -> Decimal {
        self.cost + self.freight + self.profit
    }
}
