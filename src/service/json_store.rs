//! JSON document store
//!
//! Keeps one `<building-id>.json` document per building in a directory.
//! Writes go to a temporary file that is renamed over the target, and the
//! revision check plus the write run under one store-wide async lock, so a
//! save is an atomic conditional write with respect to other users of the
//! same store. File I/O runs on the blocking pool, never on a runtime worker.

use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex as AsyncMutex;

use super::store::BuildingStore;
use crate::core::document::BuildingDocument;
use crate::core::{BlockError, Building, BuildingId, StorageError};

pub struct JsonFileStore {
    root: PathBuf,
    write_lock: AsyncMutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: AsyncMutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Seed a building, replacing any previous document with the same ID
    pub async fn insert(&self, building: &Building) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.write(building.to_document()).await
    }

    fn path_for(&self, id: BuildingId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    async fn read(&self, id: BuildingId) -> Result<BuildingDocument, BlockError> {
        let path = self.path_for(id);
        run_blocking(move || read_document(&path, id)).await
    }

    async fn write(&self, doc: BuildingDocument) -> Result<(), StorageError> {
        let path = self.path_for(doc.id);
        run_blocking(move || write_document(&path, &doc)).await
    }
}

fn read_document(path: &Path, id: BuildingId) -> Result<BuildingDocument, BlockError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(BlockError::building_not_found(id))
        }
        Err(e) => return Err(StorageError::from(e).into()),
    };
    let doc = serde_json::from_slice(&bytes).map_err(StorageError::from)?;
    Ok(doc)
}

fn write_document(path: &Path, doc: &BuildingDocument) -> Result<(), StorageError> {
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(doc)?;
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Run blocking file work on tokio's blocking pool
async fn run_blocking<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StorageError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(E::from(StorageError::Backend(format!(
            "blocking I/O task failed: {}",
            e
        )))),
    }
}

#[async_trait]
impl BuildingStore for JsonFileStore {
    async fn load(&self, id: BuildingId) -> Result<Building, BlockError> {
        let doc = self.read(id).await?;
        tracing::debug!(building_id = %id, blocks = doc.blocks.len(), "loaded building document");
        doc.decode()
    }

    async fn save(&self, building: &Building) -> Result<(), BlockError> {
        let _guard = self.write_lock.lock().await;

        let stored = self.read(building.id).await?;
        if stored.revision != building.revision {
            tracing::warn!(
                building_id = %building.id,
                expected = building.revision,
                found = stored.revision,
                "rejected stale building save"
            );
            return Err(StorageError::Conflict {
                building: building.id,
                expected: building.revision,
                found: stored.revision,
            }
            .into());
        }

        let mut doc = building.to_document();
        doc.revision += 1;
        self.write(doc).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Block, MasonryAttributes, NewBlock};
    use crate::core::masonry::MasonryUnit;
    use crate::core::BlockId;

    fn building_with_block() -> Building {
        let mut building = Building::new(BuildingId::new(), "B-77", "URM");
        let block = Block::create(
            BlockId::new(),
            NewBlock::masonry(
                "Main",
                12.0,
                8.0,
                vec![3.2, 3.0],
                MasonryAttributes {
                    unit_type_list: vec![MasonryUnit::new("Stone", 0.4, 0.25, 0.2)],
                },
            ),
        )
        .unwrap();
        building.blocks.add(block).unwrap();
        building
    }

    #[tokio::test]
    async fn test_insert_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let building = building_with_block();

        store.insert(&building).await.unwrap();
        let loaded = store.load(building.id).await.unwrap();
        assert_eq!(loaded, building);
    }

    #[tokio::test]
    async fn test_save_and_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let building = building_with_block();
        store.insert(&building).await.unwrap();

        let stale = store.load(building.id).await.unwrap();
        let mut fresh = store.load(building.id).await.unwrap();
        fresh.bks = "URM-retrofit".into();
        store.save(&fresh).await.unwrap();

        let reloaded = store.load(building.id).await.unwrap();
        assert_eq!(reloaded.revision, 1);
        assert_eq!(reloaded.bks, "URM-retrofit");

        assert!(matches!(
            store.save(&stale).await,
            Err(BlockError::Storage(StorageError::Conflict { .. }))
        ));
    }

    #[tokio::test]
    async fn test_missing_building() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let id = BuildingId::new();

        assert!(matches!(store.load(id).await, Err(BlockError::NotFound { .. })));
        let building = Building::new(id, "B-0", "RC");
        assert!(matches!(store.save(&building).await, Err(BlockError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let id = BuildingId::new();
        fs::write(dir.path().join(format!("{}.json", id)), b"{ not json").unwrap();

        assert!(matches!(
            store.load(id).await,
            Err(BlockError::Storage(StorageError::Serialization(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_stored_variant() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let building = building_with_block();
        store.insert(&building).await.unwrap();

        let path = dir.path().join(format!("{}.json", building.id));
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("\"Masonry\"", "\"Timber\"")).unwrap();

        assert!(matches!(
            store.load(building.id).await,
            Err(BlockError::UnsupportedVariant(_))
        ));
    }
}
