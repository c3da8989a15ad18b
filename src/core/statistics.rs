//! Statistics engine for blocks and buildings
//!
//! Pure functions that derive engineering metrics from the current block
//! geometry. Nothing is cached; every call recomputes from the given state.
//!
//! ## Block metrics
//!
//! | Metric | Definition |
//! |--------|------------|
//! | `area` | `xAxisLength * yAxisLength` |
//! | `height` | `totalHeight` |
//! | `storey_count` | number of storeys |
//! | `aspect_ratio` | `longLength / shortLength` |
//! | `volume_estimate` | `area * totalHeight` |
//!
//! ## Building metrics
//!
//! | Metric | Definition |
//! |--------|------------|
//! | `block_count` | all blocks |
//! | `concrete_block_count` / `masonry_block_count` | blocks per variant |
//! | `total_area` | sum of block areas |
//! | `max_height` | tallest block; undefined for an empty building |

use serde::{Deserialize, Serialize};

use super::block::{Block, ModelingType};
use super::building::Building;
use super::error::BlockError;

/// Derived metrics of a single block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStatistics {
    pub modeling_type: ModelingType,
    pub area: f64,
    pub height: f64,
    pub storey_count: usize,
    pub aspect_ratio: f64,
    pub volume_estimate: f64,
}

/// Derived metrics of a building's block collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingStatistics {
    pub block_count: usize,
    pub concrete_block_count: usize,
    pub masonry_block_count: usize,
    pub total_area: f64,
    pub max_height: f64,
}

/// Ratio of the long plan side to the short plan side
///
/// # Returns
/// * `Err(BlockError::DivisionUndefined)` if `short_length` is zero, negative
///   or not finite
pub fn aspect_ratio(long_length: f64, short_length: f64) -> Result<f64, BlockError> {
    if !(short_length.is_finite() && short_length > 0.0) {
        return Err(BlockError::DivisionUndefined(
            "aspect ratio requires a positive short length",
        ));
    }
    Ok(long_length / short_length)
}

/// Compute the derived metrics of one block
///
/// # Example
/// ```
/// use structural_blocks::core::block::{Block, MasonryAttributes, NewBlock};
/// use structural_blocks::core::statistics::block_statistics;
/// use structural_blocks::core::BlockId;
///
/// let block = Block::create(
///     BlockId::new(),
///     NewBlock::masonry("Annex", 10.0, 4.0, vec![3.0, 3.0, 3.0], MasonryAttributes::default()),
/// )
/// .unwrap();
///
/// let stats = block_statistics(&block).unwrap();
/// assert_eq!(stats.area, 40.0);
/// assert_eq!(stats.aspect_ratio, 2.5);
/// assert_eq!(stats.volume_estimate, 360.0);
/// ```
pub fn block_statistics(block: &Block) -> Result<BlockStatistics, BlockError> {
    let area = block_area(block);
    let height = block.total_height();

    Ok(BlockStatistics {
        modeling_type: block.modeling_type(),
        area,
        height,
        storey_count: block.storey_count(),
        aspect_ratio: aspect_ratio(block.long_length(), block.short_length())?,
        volume_estimate: area * height,
    })
}

/// Compute the aggregate metrics of a building
///
/// # Returns
/// * `Err(BlockError::EmptyCollection)` if the building has no blocks, since
///   `max_height` is undefined
pub fn building_statistics(building: &Building) -> Result<BuildingStatistics, BlockError> {
    let blocks = &building.blocks;

    let max_height = blocks
        .iter()
        .map(Block::total_height)
        .reduce(f64::max)
        .ok_or(BlockError::EmptyCollection(
            "building has no blocks; max height is undefined",
        ))?;

    let mut concrete_block_count = 0;
    let mut masonry_block_count = 0;
    for block in blocks {
        match block.modeling_type() {
            ModelingType::Concrete => concrete_block_count += 1,
            ModelingType::Masonry => masonry_block_count += 1,
        }
    }

    Ok(BuildingStatistics {
        block_count: blocks.len(),
        concrete_block_count,
        masonry_block_count,
        total_area: blocks.iter().map(block_area).sum(),
        max_height,
    })
}

fn block_area(block: &Block) -> f64 {
    block.x_axis_length() * block.y_axis_length()
}
