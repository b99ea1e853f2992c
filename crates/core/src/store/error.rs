//! Storage port error types.

use std::fmt;

use reparto_shared::types::OrderId;
use thiserror::Error;

/// The entity kinds a store operation can fail over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A sale record.
    Sale,
    /// A ledger account.
    Account,
    /// A client.
    Client,
    /// A purchase order.
    Order,
    /// An account movement.
    Movement,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sale => "sale",
            Self::Account => "account",
            Self::Client => "client",
            Self::Order => "order",
            Self::Movement => "movement",
        })
    }
}

/// Errors surfaced by storage adapters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up.
        entity: Entity,
        /// The missing ID.
        id: String,
    },

    /// A guarded write found the entity in a different state than expected.
    #[error("{entity} was modified concurrently: {id}")]
    Conflict {
        /// What kind of entity was contended.
        entity: Entity,
        /// The contended ID.
        id: String,
    },

    /// A stock decrement would overdraw the order.
    #[error("order {order_id} has {remaining} units left, {requested} requested")]
    StockDepleted {
        /// The overdrawn order.
        order_id: OrderId,
        /// Units the decrement asked for.
        requested: i64,
        /// Units actually remaining.
        remaining: i64,
    },

    /// The backend itself failed.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// A `NotFound` for the given entity and ID.
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// A `Conflict` for the given entity and ID.
    pub fn conflict(entity: Entity, id: impl fmt::Display) -> Self {
        Self::Conflict {
            entity,
            id: id.to_string(),
        }
    }
}
