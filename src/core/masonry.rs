//! Masonry unit descriptors

use serde::{Deserialize, Serialize};

use super::error::BlockError;

/// A masonry unit used in a masonry block (brick, stone, hollow block, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasonryUnit {
    /// Unit material or type, e.g. "Solid clay brick"
    pub unit_type: String,
    /// Unit length in meters
    pub length: f64,
    /// Unit width in meters
    pub width: f64,
    /// Unit height in meters
    pub height: f64,
}

impl MasonryUnit {
    pub fn new(unit_type: impl Into<String>, length: f64, width: f64, height: f64) -> Self {
        Self {
            unit_type: unit_type.into(),
            length,
            width,
            height,
        }
    }

    /// Unit volume in cubic meters
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), BlockError> {
        if self.unit_type.trim().is_empty() {
            return Err(BlockError::Validation(format!(
                "unitTypeList[{}]: unit type cannot be empty",
                index
            )));
        }
        for (field, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(BlockError::Validation(format!(
                    "unitTypeList[{}]: {} must be a positive number, got {}",
                    index, field, value
                )));
            }
        }
        Ok(())
    }
}
