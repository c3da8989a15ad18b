//! Structural Blocks - block domain model for structural-engineering records
//!
//! This crate records the structural blocks of a building (Concrete or
//! Masonry), keeps them in a per-building registry, copies them, and derives
//! engineering statistics from their geometry. The `service` module wires the
//! core to a building store with per-building serialization.

pub mod core;
pub mod service;
mod tests;

// Re-export commonly used types
pub use crate::core::{Block, BlockError, BlockId, Building, BuildingId, ModelingType, NewBlock};
pub use crate::service::{BlockService, BuildingStore, InMemoryBuildingStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
