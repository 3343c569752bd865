//! Layout definitions: authored symbolic descriptions of a structure.

use serde::{Deserialize, Serialize};

use crate::error::{LayerId, Result, StructureError};

/// Data-driven structure layout.
///
/// # Example RON
///
/// ```ron
/// LayoutDefinition(
///     name: "Outpost",
///     terrain_grid: Some([
///         "SS",
///         "SS",
///     ]),
///     layouts: [
///         ["#.", "#."],
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    /// Unique name of this layout.
    pub name: String,

    /// Terrain rows, painted once before any content layer.
    #[serde(default)]
    pub terrain_grid: Option<Vec<String>>,

    /// Content layers, stacked in declaration order.
    #[serde(default)]
    pub layouts: Vec<Vec<String>>,
}

impl LayoutDefinition {
    /// Create a definition with content layers and no terrain.
    pub fn new(name: impl Into<String>, layouts: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            terrain_grid: None,
            layouts,
        }
    }

    /// Attach a terrain grid.
    #[must_use]
    pub fn with_terrain(mut self, terrain_grid: Vec<String>) -> Self {
        self.terrain_grid = Some(terrain_grid);
        self
    }

    /// Parse a definition from RON.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ParseError`] if the text is not a valid definition.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| StructureError::ParseError(e.to_string()))
    }

    /// The grid that decides the footprint: terrain if present, else the first layer.
    #[must_use]
    pub fn primary_grid(&self) -> Option<(LayerId, &[String])> {
        match &self.terrain_grid {
            Some(rows) => Some((LayerId::Terrain, rows.as_slice())),
            None => self
                .layouts
                .first()
                .map(|rows| (LayerId::Content(0), rows.as_slice())),
        }
    }

    /// Every grid in generation order: terrain first, then each content layer.
    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &[String])> {
        self.terrain_grid
            .iter()
            .map(|rows| (LayerId::Terrain, rows.as_slice()))
            .chain(
                self.layouts
                    .iter()
                    .enumerate()
                    .map(|(i, rows)| (LayerId::Content(i), rows.as_slice())),
            )
    }

    /// Whether a terrain grid is present.
    #[must_use]
    pub const fn has_terrain(&self) -> bool {
        self.terrain_grid.is_some()
    }
}
