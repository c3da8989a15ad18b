//! Block variant model
//!
//! A structural block is either a Concrete or a Masonry block. Both share the
//! same plan geometry and storey layout; each variant carries its own material
//! attributes. The variant is fixed at creation and every consumer matches on
//! it exhaustively, so a block is never read or written through the wrong kind.
//!
//! Derived quantities (`total_height`, `long_length`, `short_length`) are never
//! stored. They are recomputed from the current geometry on every call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::document::BlockDocument;
use super::error::BlockError;
use super::masonry::MasonryUnit;
use super::BlockId;

/// Variant discriminant of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelingType {
    /// Reinforced concrete block
    Concrete,
    /// Unreinforced or confined masonry block
    Masonry,
}

impl ModelingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelingType::Concrete => "Concrete",
            ModelingType::Masonry => "Masonry",
        }
    }
}

impl fmt::Display for ModelingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelingType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Concrete" => Ok(ModelingType::Concrete),
            "Masonry" => Ok(ModelingType::Masonry),
            other => Err(BlockError::UnsupportedVariant(other.to_string())),
        }
    }
}

/// Material attributes of a concrete block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcreteAttributes {
    /// Concrete compressive strength (MPa)
    pub compressive_strength_of_concrete: f64,
    /// Reinforcement yield strength (MPa)
    pub yield_strength_of_steel: f64,
    /// Spacing of transverse reinforcement (m)
    pub transverse_reinforcement_spacing: f64,
    /// Longitudinal reinforcement ratio
    pub reinforcement_ratio: f64,
    /// Whether transverse reinforcement has seismic hooks
    pub hook_exists: bool,
    /// Whether the block has been retrofitted
    pub is_strengthened: bool,
}

impl ConcreteAttributes {
    fn validate(&self) -> Result<(), BlockError> {
        require_positive(
            "compressiveStrengthOfConcrete",
            self.compressive_strength_of_concrete,
        )?;
        require_positive("yieldStrengthOfSteel", self.yield_strength_of_steel)?;
        require_positive(
            "transverseReinforcementSpacing",
            self.transverse_reinforcement_spacing,
        )?;
        require_positive("reinforcementRatio", self.reinforcement_ratio)
    }
}

/// Material attributes of a masonry block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasonryAttributes {
    /// Masonry units used in the block, in declaration order. May be empty.
    pub unit_type_list: Vec<MasonryUnit>,
}

impl MasonryAttributes {
    fn validate(&self) -> Result<(), BlockError> {
        self.unit_type_list
            .iter()
            .enumerate()
            .try_for_each(|(i, unit)| unit.validate(i))
    }
}

/// Variant-specific part of a block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockVariant {
    Concrete(ConcreteAttributes),
    Masonry(MasonryAttributes),
}

impl BlockVariant {
    pub fn modeling_type(&self) -> ModelingType {
        match self {
            BlockVariant::Concrete(_) => ModelingType::Concrete,
            BlockVariant::Masonry(_) => ModelingType::Masonry,
        }
    }

    fn validate(&self) -> Result<(), BlockError> {
        match self {
            BlockVariant::Concrete(attrs) => attrs.validate(),
            BlockVariant::Masonry(attrs) => attrs.validate(),
        }
    }
}

/// Input for creating a block
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlock {
    pub name: String,
    pub x_axis_length: f64,
    pub y_axis_length: f64,
    /// Storey heights from the bottom storey up
    pub storey_height: Vec<f64>,
    pub variant: BlockVariant,
}

impl NewBlock {
    pub fn concrete(
        name: impl Into<String>,
        x_axis_length: f64,
        y_axis_length: f64,
        storey_height: Vec<f64>,
        attributes: ConcreteAttributes,
    ) -> Self {
        Self {
            name: name.into(),
            x_axis_length,
            y_axis_length,
            storey_height,
            variant: BlockVariant::Concrete(attributes),
        }
    }

    pub fn masonry(
        name: impl Into<String>,
        x_axis_length: f64,
        y_axis_length: f64,
        storey_height: Vec<f64>,
        attributes: MasonryAttributes,
    ) -> Self {
        Self {
            name: name.into(),
            x_axis_length,
            y_axis_length,
            storey_height,
            variant: BlockVariant::Masonry(attributes),
        }
    }
}

/// A structural block belonging to exactly one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BlockDocument", try_from = "BlockDocument")]
pub struct Block {
    id: BlockId,
    name: String,
    x_axis_length: f64,
    y_axis_length: f64,
    storey_height: Vec<f64>,
    variant: BlockVariant,
}

impl Block {
    /// Validate the input and build a block with the given identity
    ///
    /// # Returns
    /// * `Ok(Block)` if every shared and variant-specific field is valid
    /// * `Err(BlockError::Validation)` otherwise
    pub fn create(id: BlockId, new: NewBlock) -> Result<Self, BlockError> {
        if new.name.trim().is_empty() {
            return Err(BlockError::Validation("name cannot be empty".into()));
        }
        require_positive("xAxisLength", new.x_axis_length)?;
        require_positive("yAxisLength", new.y_axis_length)?;
        if new.storey_height.is_empty() {
            return Err(BlockError::Validation(
                "storeyHeight must contain at least one storey".into(),
            ));
        }
        for (i, height) in new.storey_height.iter().enumerate() {
            require_positive(&format!("storeyHeight[{}]", i), *height)?;
        }
        let total_height: f64 = new.storey_height.iter().sum();
        if !total_height.is_finite() {
            return Err(BlockError::Validation(
                "storeyHeight sums to a non-finite total height".into(),
            ));
        }
        if !(new.x_axis_length * new.y_axis_length * total_height).is_finite() {
            return Err(BlockError::Validation(
                "block dimensions overflow the derived area or volume".into(),
            ));
        }
        new.variant.validate()?;

        Ok(Self {
            id,
            name: new.name,
            x_axis_length: new.x_axis_length,
            y_axis_length: new.y_axis_length,
            storey_height: new.storey_height,
            variant: new.variant,
        })
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x_axis_length(&self) -> f64 {
        self.x_axis_length
    }

    pub fn y_axis_length(&self) -> f64 {
        self.y_axis_length
    }

    pub fn storey_height(&self) -> &[f64] {
        &self.storey_height
    }

    pub fn storey_count(&self) -> usize {
        self.storey_height.len()
    }

    /// Sum of all storey heights
    pub fn total_height(&self) -> f64 {
        self.storey_height.iter().sum()
    }

    pub fn long_length(&self) -> f64 {
        self.x_axis_length.max(self.y_axis_length)
    }

    pub fn short_length(&self) -> f64 {
        self.x_axis_length.min(self.y_axis_length)
    }

    pub fn modeling_type(&self) -> ModelingType {
        self.variant.modeling_type()
    }

    pub fn variant(&self) -> &BlockVariant {
        &self.variant
    }

    /// Concrete attributes, or `TypeMismatch` for a masonry block
    pub fn as_concrete(&self) -> Result<&ConcreteAttributes, BlockError> {
        match &self.variant {
            BlockVariant::Concrete(attrs) => Ok(attrs),
            BlockVariant::Masonry(_) => Err(BlockError::TypeMismatch {
                expected: ModelingType::Concrete,
                found: ModelingType::Masonry,
            }),
        }
    }

    /// Masonry attributes, or `TypeMismatch` for a concrete block
    pub fn as_masonry(&self) -> Result<&MasonryAttributes, BlockError> {
        match &self.variant {
            BlockVariant::Masonry(attrs) => Ok(attrs),
            BlockVariant::Concrete(_) => Err(BlockError::TypeMismatch {
                expected: ModelingType::Masonry,
                found: ModelingType::Concrete,
            }),
        }
    }

    /// Creation input carrying this block's current fields
    pub fn to_new_block(&self) -> NewBlock {
        NewBlock {
            name: self.name.clone(),
            x_axis_length: self.x_axis_length,
            y_axis_length: self.y_axis_length,
            storey_height: self.storey_height.clone(),
            variant: self.variant.clone(),
        }
    }

    /// Build the block that results from applying `update`
    ///
    /// `self` is left untouched. Omitted fields keep their current value.
    /// The candidate goes through the same validation as a fresh block, so
    /// either every supplied field is applied or the whole update is rejected.
    pub fn updated(&self, update: &BlockUpdate) -> Result<Block, BlockError> {
        let (common, variant) = match (&self.variant, update) {
            (BlockVariant::Concrete(current), BlockUpdate::Concrete(u)) => {
                (&u.common, BlockVariant::Concrete(u.apply_to(current)))
            }
            (BlockVariant::Masonry(current), BlockUpdate::Masonry(u)) => {
                (&u.common, BlockVariant::Masonry(u.apply_to(current)))
            }
            (current, requested) => {
                return Err(BlockError::TypeMismatch {
                    expected: requested.modeling_type(),
                    found: current.modeling_type(),
                })
            }
        };

        let candidate = NewBlock {
            name: common.name.clone().unwrap_or_else(|| self.name.clone()),
            x_axis_length: common.x_axis_length.unwrap_or(self.x_axis_length),
            y_axis_length: common.y_axis_length.unwrap_or(self.y_axis_length),
            storey_height: common
                .storey_height
                .clone()
                .unwrap_or_else(|| self.storey_height.clone()),
            variant,
        };
        Block::create(self.id, candidate)
    }

    /// Variant-independent view of this block
    pub fn summary(&self) -> BlockSummary {
        BlockSummary {
            id: self.id,
            name: self.name.clone(),
            modeling_type: self.modeling_type(),
            x_axis_length: self.x_axis_length,
            y_axis_length: self.y_axis_length,
            storey_height: self.storey_height.clone(),
            total_height: self.total_height(),
            long_length: self.long_length(),
            short_length: self.short_length(),
        }
    }
}

/// Fields shared by all blocks, as seen by callers that do not care about the
/// variant (listings, overviews).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub id: BlockId,
    pub name: String,
    pub modeling_type: ModelingType,
    pub x_axis_length: f64,
    pub y_axis_length: f64,
    pub storey_height: Vec<f64>,
    pub total_height: f64,
    pub long_length: f64,
    pub short_length: f64,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        block.summary()
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

/// Replacement values for the shared mutable fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonUpdate {
    pub name: Option<String>,
    pub x_axis_length: Option<f64>,
    pub y_axis_length: Option<f64>,
    pub storey_height: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConcreteUpdate {
    pub common: CommonUpdate,
    pub compressive_strength_of_concrete: Option<f64>,
    pub yield_strength_of_steel: Option<f64>,
    pub transverse_reinforcement_spacing: Option<f64>,
    pub reinforcement_ratio: Option<f64>,
    pub hook_exists: Option<bool>,
    pub is_strengthened: Option<bool>,
}

impl ConcreteUpdate {
    fn apply_to(&self, current: &ConcreteAttributes) -> ConcreteAttributes {
        ConcreteAttributes {
            compressive_strength_of_concrete: self
                .compressive_strength_of_concrete
                .unwrap_or(current.compressive_strength_of_concrete),
            yield_strength_of_steel: self
                .yield_strength_of_steel
                .unwrap_or(current.yield_strength_of_steel),
            transverse_reinforcement_spacing: self
                .transverse_reinforcement_spacing
                .unwrap_or(current.transverse_reinforcement_spacing),
            reinforcement_ratio: self.reinforcement_ratio.unwrap_or(current.reinforcement_ratio),
            hook_exists: self.hook_exists.unwrap_or(current.hook_exists),
            is_strengthened: self.is_strengthened.unwrap_or(current.is_strengthened),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MasonryUpdate {
    pub common: CommonUpdate,
    /// Replaces the whole unit list when present
    pub unit_type_list: Option<Vec<MasonryUnit>>,
}

impl MasonryUpdate {
    fn apply_to(&self, current: &MasonryAttributes) -> MasonryAttributes {
        MasonryAttributes {
            unit_type_list: self
                .unit_type_list
                .clone()
                .unwrap_or_else(|| current.unit_type_list.clone()),
        }
    }
}

/// A variant-tagged mutation of an existing block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockUpdate {
    Concrete(ConcreteUpdate),
    Masonry(MasonryUpdate),
}

impl BlockUpdate {
    pub fn modeling_type(&self) -> ModelingType {
        match self {
            BlockUpdate::Concrete(_) => ModelingType::Concrete,
            BlockUpdate::Masonry(_) => ModelingType::Masonry,
        }
    }
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<(), BlockError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BlockError::Validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}
