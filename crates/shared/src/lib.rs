//! Shared types, errors, and configuration for Reparto.
//!
//! This crate provides common types used across all other crates:
//! - Monetary rounding and clamping utilities with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{EngineConfig, StockPolicy};
pub use error::{AppError, AppResult};
