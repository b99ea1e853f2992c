//! Distribution error types.

use thiserror::Error;

/// Errors that can occur when validating sale terms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    /// Quantity must be a positive whole number.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    /// A unit price cannot be negative.
    #[error("{field} cannot be negative")]
    NegativePrice {
        /// The offending input field.
        field: &'static str,
    },
}

impl DistributionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativePrice { .. } => "NEGATIVE_PRICE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        // All term validation failures are bad requests.
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DistributionError::NonPositiveQuantity(0).error_code(),
            "NON_POSITIVE_QUANTITY"
        );
        assert_eq!(
            DistributionError::NegativePrice { field: "unit sale price" }.error_code(),
            "NEGATIVE_PRICE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(DistributionError::NonPositiveQuantity(-3).http_status_code(), 400);
        assert_eq!(
            DistributionError::NegativePrice { field: "unit freight price" }.http_status_code(),
            400
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            DistributionError::NonPositiveQuantity(-3).to_string(),
            "Quantity must be positive, got -3"
        );
        assert_eq!(
            DistributionError::NegativePrice { field: "unit cost price" }.to_string(),
            "unit cost price cannot be negative"
        );
    }
}
