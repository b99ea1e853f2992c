//! Sale lifecycle error types.

use thiserror::Error;

use reparto_shared::error::AppError;
use reparto_shared::types::OrderId;

use crate::distribution::DistributionError;
use crate::ledger::LedgerError;
use crate::store::{Entity, StoreError};

/// Errors from the sale lifecycle orchestrator.
///
/// This is the boundary-facing enum: everything the engine can fail with
/// on a sale operation converges here, with stable codes and an HTTP
/// mapping for the transport layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    // ========== Validation Errors ==========
    /// The sale terms failed validation.
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// A monetary input was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Which input failed validation.
        field: &'static str,
    },

    /// An identifier on the wire could not be parsed.
    #[error("{field} is not a valid identifier: {value}")]
    InvalidIdentifier {
        /// Which request field held the identifier.
        field: &'static str,
        /// The unparseable value as received.
        value: String,
    },

    // ========== Not Found Errors ==========
    /// The sale does not exist.
    #[error("sale not found: {id}")]
    SaleNotFound {
        /// The missing sale ID.
        id: String,
    },

    /// The owning client does not exist.
    #[error("client not found: {id}")]
    ClientNotFound {
        /// The missing client ID.
        id: String,
    },

    /// The linked purchase order does not exist.
    #[error("purchase order not found: {id}")]
    OrderNotFound {
        /// The missing order ID.
        id: String,
    },

    /// A distribution account does not exist.
    #[error("account not found: {id}")]
    AccountNotFound {
        /// The missing account ID.
        id: String,
    },

    // ========== Stock Errors ==========
    /// The linked purchase order cannot cover the sale quantity.
    #[error("purchase order {order_id} has {remaining} units left, sale needs {requested}")]
    InsufficientStock {
        /// The order whose stock ran out.
        order_id: OrderId,
        /// Units the sale asked for.
        requested: i64,
        /// Units actually available.
        remaining: i64,
    },

    // ========== Concurrency Errors ==========
    /// Another writer changed the sale between read and write.
    #[error("sale was modified concurrently, retry the operation")]
    Conflict,

    // ========== Storage Errors ==========
    /// The backing store failed mid-operation.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl SaleError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Distribution(inner) => inner.error_code(),
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::SaleNotFound { .. } => "SALE_NOT_FOUND",
            Self::ClientNotFound { .. } => "CLIENT_NOT_FOUND",
            Self::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::Conflict => "CONFLICT",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code this error maps to at the boundary.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Distribution(_)
            | Self::NegativeAmount { .. }
            | Self::InvalidIdentifier { .. } => 400,
            Self::SaleNotFound { .. }
            | Self::ClientNotFound { .. }
            | Self::OrderNotFound { .. }
            | Self::AccountNotFound { .. } => 404,
            Self::InsufficientStock { .. } | Self::Conflict => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict | Self::Storage(_))
    }

    fn missing(entity: Entity, id: String) -> Self {
        match entity {
            Entity::Sale => Self::SaleNotFound { id },
            Entity::Client => Self::ClientNotFound { id },
            Entity::Order => Self::OrderNotFound { id },
            Entity::Account => Self::AccountNotFound { id },
            // Movements are internal records, never looked up by callers.
            Entity::Movement => Self::Storage(format!("movement not found: {id}")),
        }
    }
}

impl From<StoreError> for SaleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::missing(entity, id),
            StoreError::Conflict { .. } => Self::Conflict,
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

impl From<LedgerError> for SaleError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound { entity, id } => Self::missing(entity, id),
            LedgerError::InsufficientStock {
                order_id,
                requested,
                remaining,
            } => Self::InsufficientStock {
                order_id,
                requested,
                remaining,
            },
            LedgerError::ConcurrentModification => Self::Conflict,
            LedgerError::Storage(msg) => Self::Storage(msg),
        }
    }
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        let message = err.to_string();
        match err {
            SaleError::Distribution(_)
            | SaleError::NegativeAmount { .. }
            | SaleError::InvalidIdentifier { .. } => Self::Validation(message),
            SaleError::SaleNotFound { .. }
            | SaleError::ClientNotFound { .. }
            | SaleError::OrderNotFound { .. }
            | SaleError::AccountNotFound { .. } => Self::NotFound(message),
            SaleError::InsufficientStock { .. } | SaleError::Conflict => Self::Conflict(message),
            SaleError::Storage(_) => Self::Storage(message),
        }
    }
}
