//! Block Registry - ordered, per-building collection of blocks
//!
//! The registry owns every block of one building and enforces:
//! - block IDs are unique within the building
//! - insertion order is the canonical listing order
//! - updates are all-or-nothing
//!
//! The registry itself is not synchronized. Callers that share a building
//! between tasks serialize access per building (see `service::BlockService`).

use super::block::{Block, BlockUpdate, ModelingType};
use super::error::BlockError;
use super::BlockId;

/// Ordered collection of the blocks of one building
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
}

impl BlockRegistry {
    /// Create a new empty block registry
    ///
    /// # Example
    /// ```
    /// use structural_blocks::core::registry::BlockRegistry;
    ///
    /// let registry = BlockRegistry::new();
    /// assert!(registry.is_empty());
    /// ```
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Append a block to the registry
    ///
    /// # Returns
    /// * `Ok(&Block)` pointing at the stored block
    /// * `Err(BlockError::DuplicateId)` if the ID is already present; the
    ///   registry is left unchanged
    pub fn add(&mut self, block: Block) -> Result<&Block, BlockError> {
        if self.contains(block.id()) {
            return Err(BlockError::DuplicateId(block.id()));
        }

        self.blocks.push(block);
        let index = self.blocks.len() - 1;
        Ok(&self.blocks[index])
    }

    /// Get a block by its ID
    pub fn get(&self, id: BlockId) -> Result<&Block, BlockError> {
        self.blocks
            .iter()
            .find(|b| b.id() == id)
            .ok_or_else(|| BlockError::block_not_found(id))
    }

    /// Remove a block, returning it
    ///
    /// Order of the remaining blocks is preserved.
    pub fn remove(&mut self, id: BlockId) -> Result<Block, BlockError> {
        let index = self.position(id)?;
        Ok(self.blocks.remove(index))
    }

    /// Apply a variant-tagged update to a stored block
    ///
    /// The replacement is computed and validated before the stored block is
    /// touched, so a failing update leaves the registry exactly as it was.
    ///
    /// # Returns
    /// * `Err(BlockError::NotFound)` if the block is absent
    /// * `Err(BlockError::TypeMismatch)` if the update targets the other variant
    /// * `Err(BlockError::Validation)` if any supplied value is invalid
    pub fn update(&mut self, id: BlockId, update: &BlockUpdate) -> Result<&Block, BlockError> {
        let index = self.position(id)?;
        let replacement = self.blocks[index].updated(update)?;
        self.blocks[index] = replacement;
        Ok(&self.blocks[index])
    }

    /// Blocks of one variant, in registry order
    ///
    /// The returned iterator is lazy and `Clone`, so it can be restarted; each
    /// call derives a fresh sequence from the current registry contents.
    pub fn list_by_variant(
        &self,
        kind: ModelingType,
    ) -> impl Iterator<Item = &Block> + Clone + '_ {
        self.blocks
            .iter()
            .filter(move |b| b.modeling_type() == kind)
    }

    /// All blocks, in registry order
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|b| b.id() == id)
    }

    fn position(&self, id: BlockId) -> Result<usize, BlockError> {
        self.blocks
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| BlockError::block_not_found(id))
    }
}

impl<'a> IntoIterator for &'a BlockRegistry {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{
        CommonUpdate, ConcreteAttributes, ConcreteUpdate, MasonryAttributes, MasonryUpdate,
        NewBlock,
    };
    use crate::core::masonry::MasonryUnit;

    fn concrete(name: &str) -> Block {
        Block::create(
            BlockId::new(),
            NewBlock::concrete(
                name,
                10.0,
                4.0,
                vec![3.0, 3.0, 3.0],
                ConcreteAttributes {
                    compressive_strength_of_concrete: 30.0,
                    yield_strength_of_steel: 420.0,
                    transverse_reinforcement_spacing: 0.1,
                    reinforcement_ratio: 0.012,
                    hook_exists: false,
                    is_strengthened: false,
                },
            ),
        )
        .unwrap()
    }

    fn masonry(name: &str) -> Block {
        Block::create(
            BlockId::new(),
            NewBlock::masonry(
                name,
                6.0,
                9.0,
                vec![3.0, 3.0],
                MasonryAttributes {
                    unit_type_list: vec![MasonryUnit::new("Solid clay brick", 0.19, 0.09, 0.05)],
                },
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = BlockRegistry::new();
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_and_get() {
        let mut registry = BlockRegistry::new();
        let block = concrete("A");
        let id = block.id();

        registry.add(block.clone()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap(), &block);
    }

    #[test]
    fn test_duplicate_add_leaves_registry_unchanged() {
        let mut registry = BlockRegistry::new();
        let block = concrete("A");
        registry.add(block.clone()).unwrap();
        let before = registry.clone();

        let result = registry.add(block);
        assert!(matches!(result, Err(BlockError::DuplicateId(_))));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_get_missing() {
        let registry = BlockRegistry::new();
        let result = registry.get(BlockId::new());
        assert!(matches!(
            result,
            Err(BlockError::NotFound { entity: "Block", .. })
        ));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut registry = BlockRegistry::new();
        let a = concrete("A");
        let b = masonry("B");
        let c = concrete("C");
        let b_id = b.id();
        registry.add(a).unwrap();
        registry.add(b).unwrap();
        registry.add(c).unwrap();

        let removed = registry.remove(b_id).unwrap();
        assert_eq!(removed.name(), "B");

        let names: Vec<_> = registry.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["A", "C"]);

        assert!(matches!(registry.remove(b_id), Err(BlockError::NotFound { .. })));
        assert!(matches!(registry.get(b_id), Err(BlockError::NotFound { .. })));
    }

    #[test]
    fn test_list_by_variant_is_ordered_and_restartable() {
        let mut registry = BlockRegistry::new();
        registry.add(concrete("C1")).unwrap();
        registry.add(masonry("M1")).unwrap();
        registry.add(concrete("C2")).unwrap();
        registry.add(masonry("M2")).unwrap();

        let concrete_blocks = registry.list_by_variant(ModelingType::Concrete);
        let first: Vec<_> = concrete_blocks.clone().map(|b| b.name()).collect();
        let second: Vec<_> = concrete_blocks.map(|b| b.name()).collect();
        assert_eq!(first, vec!["C1", "C2"]);
        assert_eq!(first, second);

        let masonry_names: Vec<_> = registry
            .list_by_variant(ModelingType::Masonry)
            .map(|b| b.name())
            .collect();
        assert_eq!(masonry_names, vec!["M1", "M2"]);
    }

    #[test]
    fn test_update_in_place() {
        let mut registry = BlockRegistry::new();
        let block = concrete("A");
        let id = block.id();
        registry.add(block).unwrap();
        registry.add(masonry("B")).unwrap();

        let update = BlockUpdate::Concrete(ConcreteUpdate {
            common: CommonUpdate {
                name: Some("A (retrofitted)".into()),
                ..Default::default()
            },
            is_strengthened: Some(true),
            ..Default::default()
        });
        let updated = registry.update(id, &update).unwrap();
        assert_eq!(updated.name(), "A (retrofitted)");
        assert!(updated.as_concrete().unwrap().is_strengthened);

        // position is kept
        assert_eq!(registry.iter().next().unwrap().id(), id);
    }

    #[test]
    fn test_update_failures_do_not_mutate() {
        let mut registry = BlockRegistry::new();
        let block = concrete("A");
        let id = block.id();
        registry.add(block).unwrap();
        let before = registry.clone();

        let wrong_variant = BlockUpdate::Masonry(MasonryUpdate::default());
        assert!(matches!(
            registry.update(id, &wrong_variant),
            Err(BlockError::TypeMismatch { .. })
        ));

        let invalid = BlockUpdate::Concrete(ConcreteUpdate {
            common: CommonUpdate {
                name: Some("B".into()),
                storey_height: Some(vec![]),
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(matches!(
            registry.update(id, &invalid),
            Err(BlockError::Validation(_))
        ));

        assert!(matches!(
            registry.update(BlockId::new(), &invalid),
            Err(BlockError::NotFound { .. })
        ));

        assert_eq!(registry, before);
    }
}
