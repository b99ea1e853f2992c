//! Ledger error types.

use reparto_shared::types::OrderId;
use thiserror::Error;

use crate::store::{Entity, StoreError};

/// Errors from applying or reversing distributions against the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Not Found Errors ==========
    /// A referenced entity was missing at mutation time.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// What kind of entity was missing.
        entity: Entity,
        /// The missing ID.
        id: String,
    },

    // ========== Stock Errors ==========
    /// The linked order cannot cover the sale quantity.
    #[error("order {order_id} has {remaining} units left, sale needs {requested}")]
    InsufficientStock {
        /// The overdrawn order.
        order_id: OrderId,
        /// Units the sale needs.
        requested: i64,
        /// Units actually remaining.
        remaining: i64,
    },

    // ========== Concurrency Errors ==========
    /// Another writer changed contended state mid-operation.
    #[error("concurrent modification detected, retry the operation")]
    ConcurrentModification,

    // ========== Storage Errors ==========
    /// The backing store failed mid-unit-of-work.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code this error maps to at the boundary.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InsufficientStock { .. } | Self::ConcurrentModification => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification | Self::Storage(_))
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Conflict { .. } => Self::ConcurrentModification,
            StoreError::StockDepleted {
                order_id,
                requested,
                remaining,
            } => Self::InsufficientStock {
                order_id,
                requested,
                remaining,
            },
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}
