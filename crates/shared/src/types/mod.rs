//! Common types used across the engine.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{CENT_TOLERANCE, clamp_non_negative, round_amount};
