//! Block service
//!
//! Async entry points used by the surrounding application. Every operation
//! loads the building from a `BuildingStore`; mutations then run the core
//! operation in memory and save the building back with a conditional write.
//!
//! Mutations on the same building are serialized through a per-building async
//! lock, so the check-then-write sequences inside the registry never
//! interleave. Different buildings never share a lock. Inputs reaching this
//! layer are assumed to be authenticated, authorized and deserialized.

pub mod config;
pub mod json_store;
pub mod store;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

use crate::core::block::{Block, BlockSummary, BlockUpdate, ModelingType, NewBlock};
use crate::core::statistics::{self, BlockStatistics, BuildingStatistics};
use crate::core::{copy, BlockError, BlockId, Building, BuildingId};

pub use config::ServiceConfig;
pub use json_store::JsonFileStore;
pub use store::{BuildingStore, InMemoryBuildingStore};

/// Block operations over a building store
pub struct BlockService<S> {
    store: Arc<S>,
    config: ServiceConfig,
    locks: Mutex<HashMap<BuildingId, Arc<AsyncMutex<()>>>>,
}

impl<S: BuildingStore> BlockService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Create a block in a building
    pub async fn create_block(
        &self,
        building_id: BuildingId,
        block_id: BlockId,
        new: NewBlock,
    ) -> Result<Block, BlockError> {
        let max_blocks = self.config.max_blocks_per_building;
        let block = self
            .mutate(building_id, move |building| {
                if building.blocks.contains(block_id) {
                    return Err(BlockError::DuplicateId(block_id));
                }
                ensure_capacity(building, max_blocks)?;
                let block = Block::create(block_id, new)?;
                building.blocks.add(block).cloned()
            })
            .await?;

        tracing::info!(
            building_id = %building_id,
            block_id = %block.id(),
            modeling_type = %block.modeling_type(),
            "created block"
        );
        Ok(block)
    }

    pub async fn get_block(
        &self,
        building_id: BuildingId,
        block_id: BlockId,
    ) -> Result<Block, BlockError> {
        let building = self.store.load(building_id).await?;
        building.blocks.get(block_id).cloned()
    }

    /// All blocks of a building, in registry order
    pub async fn list_blocks(&self, building_id: BuildingId) -> Result<Vec<Block>, BlockError> {
        let building = self.store.load(building_id).await?;
        Ok(building.blocks.iter().cloned().collect())
    }

    pub async fn list_by_variant(
        &self,
        building_id: BuildingId,
        kind: ModelingType,
    ) -> Result<Vec<Block>, BlockError> {
        let building = self.store.load(building_id).await?;
        Ok(building.blocks.list_by_variant(kind).cloned().collect())
    }

    /// Variant-independent views of all blocks of a building
    pub async fn block_summaries(
        &self,
        building_id: BuildingId,
    ) -> Result<Vec<BlockSummary>, BlockError> {
        let building = self.store.load(building_id).await?;
        Ok(building.blocks.iter().map(Block::summary).collect())
    }

    pub async fn update_block(
        &self,
        building_id: BuildingId,
        block_id: BlockId,
        update: BlockUpdate,
    ) -> Result<Block, BlockError> {
        let block = self
            .mutate(building_id, move |building| {
                building.blocks.update(block_id, &update).cloned()
            })
            .await?;

        tracing::info!(building_id = %building_id, block_id = %block_id, "updated block");
        Ok(block)
    }

    /// Delete a block, returning its last state
    pub async fn remove_block(
        &self,
        building_id: BuildingId,
        block_id: BlockId,
    ) -> Result<Block, BlockError> {
        let block = self
            .mutate(building_id, move |building| building.blocks.remove(block_id))
            .await?;

        tracing::info!(building_id = %building_id, block_id = %block_id, "removed block");
        Ok(block)
    }

    /// Copy a block within its building
    ///
    /// Without `new_name`, the copy is named after the source with the
    /// configured suffix appended.
    pub async fn copy_block(
        &self,
        building_id: BuildingId,
        source_id: BlockId,
        new_id: BlockId,
        new_name: Option<String>,
    ) -> Result<Block, BlockError> {
        let max_blocks = self.config.max_blocks_per_building;
        let suffix = self.config.copy_name_suffix.clone();
        let block = self
            .mutate(building_id, move |building| {
                let source_name = building.blocks.get(source_id)?.name();
                let name = new_name.unwrap_or_else(|| format!("{}{}", source_name, suffix));
                if building.blocks.contains(new_id) {
                    return Err(BlockError::DuplicateId(new_id));
                }
                ensure_capacity(building, max_blocks)?;
                copy::copy_block(&mut building.blocks, source_id, new_id, Some(name)).cloned()
            })
            .await?;

        tracing::info!(
            building_id = %building_id,
            source_id = %source_id,
            block_id = %new_id,
            "copied block"
        );
        Ok(block)
    }

    pub async fn block_statistics(
        &self,
        building_id: BuildingId,
        block_id: BlockId,
    ) -> Result<BlockStatistics, BlockError> {
        let building = self.store.load(building_id).await?;
        statistics::block_statistics(building.blocks.get(block_id)?)
    }

    pub async fn building_statistics(
        &self,
        building_id: BuildingId,
    ) -> Result<BuildingStatistics, BlockError> {
        let building = self.store.load(building_id).await?;
        statistics::building_statistics(&building)
    }

    /// Load, mutate and conditionally save one building under its lock
    ///
    /// If `f` fails nothing is saved. Once `save` has returned, the change is
    /// durable regardless of what the caller does with the result.
    async fn mutate<T, F>(&self, building_id: BuildingId, f: F) -> Result<T, BlockError>
    where
        F: FnOnce(&mut Building) -> Result<T, BlockError> + Send,
        T: Send,
    {
        let lease = self.building_lock(building_id);
        let _guard = lease.mutex().lock().await;

        let mut building = self.store.load(building_id).await?;
        let output = match f(&mut building) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!(building_id = %building_id, error = %e, "block mutation rejected");
                return Err(e);
            }
        };
        self.store.save(&building).await?;
        Ok(output)
    }

    fn building_lock(&self, building_id: BuildingId) -> LockLease<'_> {
        let lock = self
            .locks
            .lock()
            .entry(building_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();
        LockLease {
            locks: &self.locks,
            building_id,
            lock,
        }
    }

    /// Number of buildings that currently have a lock entry
    pub fn tracked_buildings(&self) -> usize {
        self.locks.lock().len()
    }
}

/// A handle on one building's lock
///
/// On drop the map entry is removed once no other handle refers to it.
/// Entries are only cloned under the map mutex, so a strong count of two
/// (the map and this handle) seen under that mutex means nobody else holds it.
struct LockLease<'a> {
    locks: &'a Mutex<HashMap<BuildingId, Arc<AsyncMutex<()>>>>,
    building_id: BuildingId,
    lock: Arc<AsyncMutex<()>>,
}

impl LockLease<'_> {
    fn mutex(&self) -> &AsyncMutex<()> {
        &self.lock
    }
}

impl Drop for LockLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.building_id);
        }
    }
}

fn ensure_capacity(building: &Building, max_blocks: usize) -> Result<(), BlockError> {
    if building.blocks.len() >= max_blocks {
        return Err(BlockError::Validation(format!(
            "building {} already holds the maximum of {} blocks",
            building.id, max_blocks
        )));
    }
    Ok(())
}
