//! Storage port and adapters.
//!
//! - [`port`]: the [`Store`] trait every persistence backend implements
//! - [`memory`]: an in-memory adapter for tests and embedded use
//! - [`error`]: adapter-level failures the engine maps to domain errors
//!
//! The port is deliberately low-level: typed fetch/insert per entity,
//! atomic add-delta for accounts, and guarded compare-and-set writes for
//! the fields the orchestrator serializes on.

pub mod error;
pub mod memory;
pub mod port;

pub use error::{Entity, StoreError};
pub use memory::MemoryStore;
pub use port::{ClientAdjustment, Store};
