//! Core block abstractions and types
//!
//! This module defines the structural block domain model: the Concrete/Masonry
//! variant representation, the per-building block registry, the copy operator
//! and the statistics engine that derives engineering metrics from geometry.

pub mod block;
pub mod building;
pub mod copy;
pub mod document;
pub mod error;
pub mod masonry;
pub mod registry;
pub mod statistics;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use block::{Block, BlockSummary, BlockVariant, ModelingType, NewBlock};
pub use building::Building;
pub use error::{BlockError, StorageError};
pub use registry::BlockRegistry;

/// Unique identifier for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Generate a new random block ID
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(BlockId)
    }
}

/// Unique identifier for a building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub Uuid);

impl BuildingId {
    /// Generate a new random building ID
    pub fn new() -> Self {
        BuildingId(Uuid::new_v4())
    }
}

impl Default for BuildingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BuildingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(BuildingId)
    }
}
