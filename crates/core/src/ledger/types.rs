//! Ledger domain types.
//!
//! This module defines the records the ledger applies sale distributions
//! against: accounts with historical counters, the movements that audit
//! every account delta, and the clients whose outstanding balances track
//! unpaid sale remainders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use reparto_shared::config::LedgerConfig;
use reparto_shared::types::{AccountId, ClientId, MovementId, SaleId};

/// Role of an account in the distribution scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Receives the cost-recovery share of each sale.
    CostRecovery,
    /// Receives the freight share of each sale.
    Freight,
    /// Receives the profit share of each sale.
    Profit,
    /// Independent pool not fed by sale distribution.
    Operational,
}

/// A ledger account with running balance and historical counters.
///
/// The invariant `balance == historical_inflows - historical_outflows`
/// holds by construction: [`Account::apply`] is the only mutation point
/// and moves the counters and the balance together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Role in the distribution scheme.
    pub role: AccountRole,
    /// Current balance.
    pub balance: Decimal,
    /// Total of all inflows ever credited. Monotonically non-decreasing
    /// outside of unit-of-work rollback.
    pub historical_inflows: Decimal,
    /// Total of all outflows ever debited. Monotonically non-decreasing
    /// outside of unit-of-work rollback.
    pub historical_outflows: Decimal,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates an empty account.
    #[must_use]
    pub fn new(id: AccountId, name: impl Into<String>, role: AccountRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            balance: Decimal::ZERO,
            historical_inflows: Decimal::ZERO,
            historical_outflows: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Applies a delta to the balance and historical counters together.
    pub fn apply(&mut self, delta: &BalanceDelta) {
        self.balance += delta.balance;
        self.historical_inflows += delta.inflows;
        self.historical_outflows += delta.outflows;
        self.updated_at = Utc::now();
    }

    /// Net history: inflows minus outflows.
    #[must_use]
    pub fn net_history(&self) -> Decimal {
        self.historical_inflows - self.historical_outflows
    }

    /// Returns true if the balance agrees with the historical counters.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        self.balance == self.net_history()
    }
}

/// A coherent change to an account: balance and counters move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    /// Change to the balance.
    pub balance: Decimal,
    /// Change to the historical inflow counter.
    pub inflows: Decimal,
    /// Change to the historical outflow counter.
    pub outflows: Decimal,
}

impl BalanceDelta {
    /// An inflow: balance and inflow counter both rise by `amount`.
    #[must_use]
    pub fn inflow(amount: Decimal) -> Self {
        Self {
            balance: amount,
            inflows: amount,
            outflows: Decimal::ZERO,
        }
    }

    /// An outflow: balance falls and the outflow counter rises by `amount`.
    #[must_use]
    pub fn outflow(amount: Decimal) -> Self {
        Self {
            balance: -amount,
            inflows: Decimal::ZERO,
            outflows: amount,
        }
    }

    /// Maps a signed amount to a direction: non-negative amounts are
    /// inflows, negative amounts outflows of the absolute value.
    ///
    /// Keeps both historical counters non-decreasing even when a loss
    /// sale distributes a negative profit share.
    #[must_use]
    pub fn signed(amount: Decimal) -> Self {
        if amount >= Decimal::ZERO {
            Self::inflow(amount)
        } else {
            Self::outflow(-amount)
        }
    }

    /// The exact opposite delta, undoing this one field by field.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            balance: -self.balance,
            inflows: -self.inflows,
            outflows: -self.outflows,
        }
    }

    /// Returns true if the delta keeps `balance == inflows - outflows`.
    #[must_use]
    pub fn is_coherent(&self) -> bool {
        self.balance == self.inflows - self.outflows
    }
}

/// Direction of an account movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Money entering the account.
    Inflow,
    /// Money leaving the account.
    Outflow,
}

/// What kind of sale event produced a movement.
///
/// Deleting a sale purges its movements rather than recording more, so
/// there is no reversal kind; reversals live in the account outflow
/// counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Initial distribution applied when the sale was created.
    Distribution,
    /// Additional payment registered on an existing sale.
    Payment,
}

/// Audit record tagging an account delta with its originating sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// The movement ID.
    pub id: MovementId,
    /// The account the delta was applied to.
    pub account_id: AccountId,
    /// The sale that produced the delta.
    pub sale_id: SaleId,
    /// Direction of the delta.
    pub direction: MovementDirection,
    /// Absolute amount moved (always non-negative).
    pub amount: Decimal,
    /// The sale event that produced this movement.
    pub kind: MovementKind,
    /// Optional note.
    pub note: Option<String>,
    /// When the movement was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Movement {
    /// Creates a new movement record.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        sale_id: SaleId,
        direction: MovementDirection,
        amount: Decimal,
        kind: MovementKind,
    ) -> Self {
        Self {
            id: MovementId::new(),
            account_id,
            sale_id,
            direction,
            amount,
            kind,
            note: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The amount with its direction applied as a sign.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            MovementDirection::Inflow => self.amount,
            MovementDirection::Outflow => -self.amount,
        }
    }
}

/// A client whose outstanding balance tracks unpaid sale remainders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// The client ID.
    pub id: ClientId,
    /// Display name.
    pub name: String,
    /// Unpaid remainder across all open sales. Never negative.
    pub outstanding_balance: Decimal,
    /// Total sale value ever attributed to this client. Never negative.
    pub lifetime_purchases: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Creates a client with zeroed balances.
    #[must_use]
    pub fn new(id: ClientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            outstanding_balance: Decimal::ZERO,
            lifetime_purchases: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }
}

/// The three accounts every sale distributes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionAccounts {
    /// Cost-recovery account.
    pub cost: AccountId,
    /// Freight account.
    pub freight: AccountId,
    /// Profit account.
    pub profit: AccountId,
}

impl DistributionAccounts {
    /// Creates the account map directly.
    #[must_use]
    pub const fn new(cost: AccountId, freight: AccountId, profit: AccountId) -> Self {
        Self {
            cost,
            freight,
            profit,
        }
    }

    /// Builds the account map from loaded configuration.
    #[must_use]
    pub const fn from_config(config: &LedgerConfig) -> Self {
        Self {
            cost: config.cost_account,
            freight: config.freight_account,
            profit: config.profit_account,
        }
    }
}
