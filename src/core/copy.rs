//! Copy operator
//!
//! Copies a block inside its own building under a new identity. The copy is
//! rebuilt through `Block::create` from the source's fields, so it is validated
//! like any new block and then inserted through `BlockRegistry::add`.

use super::block::{Block, BlockVariant, NewBlock};
use super::error::BlockError;
use super::registry::BlockRegistry;
use super::BlockId;

/// Suffix appended to the source name when no name is given for a copy
pub const COPY_NAME_SUFFIX: &str = " (Copy)";

/// Default display name of a copy of `source_name`
pub fn default_copy_name(source_name: &str) -> String {
    format!("{}{}", source_name, COPY_NAME_SUFFIX)
}

/// Copy `source_id` to a new block `new_id` in the same registry
///
/// # Returns
/// * `Ok(&Block)` pointing at the new block
/// * `Err(BlockError::NotFound)` if the source is absent
/// * `Err(BlockError::DuplicateId)` if `new_id` is already taken
pub fn copy_block(
    registry: &mut BlockRegistry,
    source_id: BlockId,
    new_id: BlockId,
    new_name: Option<String>,
) -> Result<&Block, BlockError> {
    let source = registry.get(source_id)?;

    let variant = match source.variant() {
        BlockVariant::Concrete(attrs) => BlockVariant::Concrete(attrs.clone()),
        BlockVariant::Masonry(attrs) => BlockVariant::Masonry(attrs.clone()),
    };
    let new = NewBlock {
        name: new_name.unwrap_or_else(|| default_copy_name(source.name())),
        x_axis_length: source.x_axis_length(),
        y_axis_length: source.y_axis_length(),
        storey_height: source.storey_height().to_vec(),
        variant,
    };

    let copy = Block::create(new_id, new)?;
    registry.add(copy)
}
