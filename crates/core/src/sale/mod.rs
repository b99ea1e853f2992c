//! Sale lifecycle: creation, payments and reversal.
//!
//! This module implements the orchestration half of the engine:
//! - Sale domain types and the derived payment status
//! - The lifecycle service coordinating calculator, store and ledger
//! - Wire DTOs for the legacy boundary contract
//! - Error types for sale operations

pub mod error;
pub mod service;
pub mod types;
pub mod wire;

pub use error::SaleError;
pub use service::SaleService;
pub use types::{CreateSaleInput, CreateSaleOutput, PaymentOutput, PaymentStatus, Sale};
pub use wire::{
    AckResponse, CreateSaleRequest, CreateSaleResponse, DeleteSaleRequest, DistributionSummary,
    RegisterPaymentRequest,
};
