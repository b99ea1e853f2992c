//! Purchase-order error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Errors from order costing and the order service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    // ========== Validation Errors ==========
    /// Order quantity must be strictly positive.
    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    /// A cost or payment term was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Which input failed validation.
        field: &'static str,
    },

    /// A distributor payment must move money.
    #[error("payment amount must be positive, got {0}")]
    NonPositivePayment(Decimal),

    // ========== Not Found Errors ==========
    /// The order does not exist.
    #[error("order not found: {id}")]
    NotFound {
        /// The missing order ID.
        id: String,
    },

    // ========== Concurrency Errors ==========
    /// Another writer changed the order between read and write.
    #[error("order was modified concurrently, retry the operation")]
    Conflict,

    // ========== Storage Errors ==========
    /// The backing store failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl OrderError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::NotFound { .. } => "ORDER_NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code this error maps to at the boundary.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity(_)
            | Self::NegativeAmount { .. }
            | Self::NonPositivePayment(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict | Self::Storage(_))
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => Self::NotFound { id },
            StoreError::Conflict { .. } => Self::Conflict,
            StoreError::Backend(msg) => Self::Storage(msg),
            // Stock is consumed by sales, never by order operations.
            other => Self::Storage(other.to_string()),
        }
    }
}
