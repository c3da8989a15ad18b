//! Building aggregate

use serde::{Deserialize, Serialize};

use super::document::BuildingDocument;
use super::registry::BlockRegistry;
use super::BuildingId;

/// A building and the blocks it owns
///
/// Blocks never move between buildings: the only way in is `blocks.add` (or
/// a copy within the same registry) and the only way out is `blocks.remove`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BuildingDocument", try_from = "BuildingDocument")]
pub struct Building {
    pub id: BuildingId,
    /// Building code used by the surrounding application
    pub code: String,
    /// Classification code
    pub bks: String,
    /// Storage revision, bumped by every successful save
    pub revision: u64,
    pub blocks: BlockRegistry,
}

impl Building {
    pub fn new(id: BuildingId, code: impl Into<String>, bks: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            bks: bks.into(),
            revision: 0,
            blocks: BlockRegistry::new(),
        }
    }

    pub fn to_document(&self) -> BuildingDocument {
        BuildingDocument::from(self)
    }
}

impl From<Building> for BuildingDocument {
    fn from(building: Building) -> Self {
        BuildingDocument::from(&building)
    }
}

impl TryFrom<BuildingDocument> for Building {
    type Error = super::error::BlockError;

    fn try_from(doc: BuildingDocument) -> Result<Self, Self::Error> {
        doc.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{Block, MasonryAttributes, NewBlock};
    use crate::core::BlockId;

    #[test]
    fn test_building_json_roundtrip_keeps_block_order() {
        let mut building = Building::new(BuildingId::new(), "B-104", "URM-2");
        for name in ["North wing", "South wing", "Stair core"] {
            let block = Block::create(
                BlockId::new(),
                NewBlock::masonry(name, 8.0, 5.0, vec![3.0], MasonryAttributes::default()),
            )
            .unwrap();
            building.blocks.add(block).unwrap();
        }
        building.revision = 7;

        let json = serde_json::to_string(&building).unwrap();
        let back: Building = serde_json::from_str(&json).unwrap();

        assert_eq!(back, building);
        let names: Vec<_> = back.blocks.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["North wing", "South wing", "Stair core"]);
    }
}
