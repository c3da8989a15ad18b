//! Error types shared by the block model, registry, statistics and stores

use super::block::ModelingType;
use super::{BlockId, BuildingId};

/// Block errors
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// Malformed or missing input fields
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A block was accessed or mutated through the wrong variant
    #[error("Type mismatch: expected {expected} block, found {found} block")]
    TypeMismatch {
        expected: ModelingType,
        found: ModelingType,
    },

    /// A block with the same ID already exists in the building
    #[error("Duplicate block ID: {0}")]
    DuplicateId(BlockId),

    /// Block or building is missing
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Aggregate requested over an empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(&'static str),

    /// A derived ratio has a zero or non-finite divisor
    #[error("Division undefined: {0}")]
    DivisionUndefined(&'static str),

    /// Unrecognized modeling type discriminant
    #[error("Unsupported block variant: {0}")]
    UnsupportedVariant(String),

    /// Failure reported by the persistence layer
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BlockError {
    pub fn block_not_found(id: BlockId) -> Self {
        BlockError::NotFound {
            entity: "Block",
            id: id.to_string(),
        }
    }

    pub fn building_not_found(id: BuildingId) -> Self {
        BlockError::NotFound {
            entity: "Building",
            id: id.to_string(),
        }
    }
}

/// Storage errors raised by building stores
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The stored revision moved since the building was loaded
    #[error("Write conflict on building {building}: expected revision {expected}, found {found}")]
    Conflict {
        building: BuildingId,
        expected: u64,
        found: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}
