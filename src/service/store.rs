//! Building persistence boundary
//!
//! The core never performs I/O itself. Services load a building, mutate it in
//! memory and hand it back through `BuildingStore::save`, which is a
//! conditional write: it only succeeds if nobody saved the building since it
//! was loaded.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::core::{BlockError, Building, BuildingId, StorageError};

/// Storage backend for buildings and their blocks
#[async_trait]
pub trait BuildingStore: Send + Sync {
    /// Load the current state of a building
    ///
    /// Fails with `NotFound` if the building does not exist.
    async fn load(&self, id: BuildingId) -> Result<Building, BlockError>;

    /// Persist a building loaded earlier from this store
    ///
    /// Fails with `NotFound` if the building was never stored and with
    /// `StorageError::Conflict` if the stored revision no longer matches
    /// `building.revision`. A successful save bumps the stored revision.
    async fn save(&self, building: &Building) -> Result<(), BlockError>;
}

/// In-memory building store
#[derive(Default)]
pub struct InMemoryBuildingStore {
    buildings: RwLock<HashMap<BuildingId, Building>>,
}

impl InMemoryBuildingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a building, replacing any previous entry with the same ID
    pub fn insert(&self, building: Building) {
        self.buildings.write().insert(building.id, building);
    }

    pub fn len(&self) -> usize {
        self.buildings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.read().is_empty()
    }
}

#[async_trait]
impl BuildingStore for InMemoryBuildingStore {
    async fn load(&self, id: BuildingId) -> Result<Building, BlockError> {
        self.buildings
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| BlockError::building_not_found(id))
    }

    async fn save(&self, building: &Building) -> Result<(), BlockError> {
        let mut buildings = self.buildings.write();
        let stored = buildings
            .get_mut(&building.id)
            .ok_or_else(|| BlockError::building_not_found(building.id))?;

        if stored.revision != building.revision {
            return Err(StorageError::Conflict {
                building: building.id,
                expected: building.revision,
                found: stored.revision,
            }
            .into());
        }

        let mut next = building.clone();
        next.revision += 1;
        *stored = next;
        Ok(())
    }
}
