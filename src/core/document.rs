//! Document representation of blocks and buildings
//!
//! Blocks are persisted and exchanged as flat camelCase documents carrying a
//! `modelingType` discriminant plus the union of all variant fields. Decoding
//! goes through the validated construction path, so every invariant is checked
//! again on load. Derived fields are written for readers and ignored on input.

use serde::{Deserialize, Serialize};

use super::block::{
    Block, BlockVariant, ConcreteAttributes, MasonryAttributes, ModelingType, NewBlock,
};
use super::building::Building;
use super::error::BlockError;
use super::masonry::MasonryUnit;
use super::registry::BlockRegistry;
use super::{BlockId, BuildingId};

/// Untyped block fields as supplied by the mapping layer or read from storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFields {
    pub modeling_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub x_axis_length: Option<f64>,
    #[serde(default)]
    pub y_axis_length: Option<f64>,
    #[serde(default)]
    pub storey_height: Vec<f64>,

    // Derived, output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_length: Option<f64>,

    // Concrete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressive_strength_of_concrete: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_strength_of_steel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transverse_reinforcement_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinforcement_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_exists: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_strengthened: Option<bool>,

    // Masonry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type_list: Option<Vec<MasonryUnit>>,
}

impl BlockFields {
    fn into_new_block(self, kind: ModelingType) -> Result<NewBlock, BlockError> {
        let variant = match kind {
            ModelingType::Concrete => BlockVariant::Concrete(ConcreteAttributes {
                compressive_strength_of_concrete: required(
                    "compressiveStrengthOfConcrete",
                    self.compressive_strength_of_concrete,
                )?,
                yield_strength_of_steel: required(
                    "yieldStrengthOfSteel",
                    self.yield_strength_of_steel,
                )?,
                transverse_reinforcement_spacing: required(
                    "transverseReinforcementSpacing",
                    self.transverse_reinforcement_spacing,
                )?,
                reinforcement_ratio: required("reinforcementRatio", self.reinforcement_ratio)?,
                hook_exists: required("hookExists", self.hook_exists)?,
                is_strengthened: required("isStrengthened", self.is_strengthened)?,
            }),
            ModelingType::Masonry => BlockVariant::Masonry(MasonryAttributes {
                unit_type_list: self.unit_type_list.unwrap_or_default(),
            }),
        };

        Ok(NewBlock {
            name: self.name,
            x_axis_length: required("xAxisLength", self.x_axis_length)?,
            y_axis_length: required("yAxisLength", self.y_axis_length)?,
            storey_height: self.storey_height,
            variant,
        })
    }
}

impl From<&Block> for BlockFields {
    fn from(block: &Block) -> Self {
        let mut fields = BlockFields {
            modeling_type: block.modeling_type().as_str().to_string(),
            name: block.name().to_string(),
            x_axis_length: Some(block.x_axis_length()),
            y_axis_length: Some(block.y_axis_length()),
            storey_height: block.storey_height().to_vec(),
            total_height: Some(block.total_height()),
            long_length: Some(block.long_length()),
            short_length: Some(block.short_length()),
            ..Default::default()
        };

        match block.variant() {
            BlockVariant::Concrete(attrs) => {
                fields.compressive_strength_of_concrete =
                    Some(attrs.compressive_strength_of_concrete);
                fields.yield_strength_of_steel = Some(attrs.yield_strength_of_steel);
                fields.transverse_reinforcement_spacing =
                    Some(attrs.transverse_reinforcement_spacing);
                fields.reinforcement_ratio = Some(attrs.reinforcement_ratio);
                fields.hook_exists = Some(attrs.hook_exists);
                fields.is_strengthened = Some(attrs.is_strengthened);
            }
            BlockVariant::Masonry(attrs) => {
                fields.unit_type_list = Some(attrs.unit_type_list.clone());
            }
        }

        fields
    }
}

impl NewBlock {
    /// Build a typed creation input from untyped fields
    ///
    /// An unknown `modelingType` is a caller input error here, so it is
    /// reported as `Validation` rather than `UnsupportedVariant`.
    pub fn from_fields(fields: BlockFields) -> Result<NewBlock, BlockError> {
        let kind = fields.modeling_type.parse::<ModelingType>().map_err(|_| {
            BlockError::Validation(format!(
                "modelingType must be one of Concrete, Masonry; got '{}'",
                fields.modeling_type
            ))
        })?;
        fields.into_new_block(kind)
    }
}

/// A block as stored: identity plus flattened fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDocument {
    pub id: BlockId,
    #[serde(flatten)]
    pub fields: BlockFields,
}

impl BlockDocument {
    /// Rebuild a block from a stored document
    ///
    /// An unrecognized discriminant is fatal (`UnsupportedVariant`).
    pub fn decode(self) -> Result<Block, BlockError> {
        let kind = self.fields.modeling_type.parse::<ModelingType>()?;
        let new = self.fields.into_new_block(kind)?;
        Block::create(self.id, new)
    }
}

impl From<Block> for BlockDocument {
    fn from(block: Block) -> Self {
        BlockDocument::from(&block)
    }
}

impl From<&Block> for BlockDocument {
    fn from(block: &Block) -> Self {
        BlockDocument {
            id: block.id(),
            fields: BlockFields::from(block),
        }
    }
}

impl TryFrom<BlockDocument> for Block {
    type Error = BlockError;

    fn try_from(doc: BlockDocument) -> Result<Self, Self::Error> {
        doc.decode()
    }
}

/// A building as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDocument {
    pub id: BuildingId,
    pub code: String,
    pub bks: String,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub blocks: Vec<BlockDocument>,
}

impl BuildingDocument {
    /// Rebuild a building, re-checking block invariants and ID uniqueness
    pub fn decode(self) -> Result<Building, BlockError> {
        let mut registry = BlockRegistry::new();
        for doc in self.blocks {
            registry.add(doc.decode()?)?;
        }
        Ok(Building {
            id: self.id,
            code: self.code,
            bks: self.bks,
            revision: self.revision,
            blocks: registry,
        })
    }
}

impl From<&Building> for BuildingDocument {
    fn from(building: &Building) -> Self {
        BuildingDocument {
            id: building.id,
            code: building.code.clone(),
            bks: building.bks.clone(),
            revision: building.revision,
            blocks: building.blocks.iter().map(BlockDocument::from).collect(),
        }
    }
}

fn required<T>(field: &str, value: Option<T>) -> Result<T, BlockError> {
    value.ok_or_else(|| BlockError::Validation(format!("{} is required", field)))
}
