//! Placement instructions and the host map they are applied to.

use serde::{Deserialize, Serialize};

use crate::region::Cell;
use crate::symbol::{Rotation, ThingCategory};

/// Set the terrain of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainPlacement {
    /// Absolute cell.
    pub cell: Cell,
    /// Host terrain identifier.
    pub terrain: String,
}

/// Spawn one thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThingPlacement {
    /// Absolute cell of the thing's first covered column.
    pub cell: Cell,
    /// Host prototype identifier.
    pub prototype: String,
    /// Facing.
    pub rotation: Rotation,
    /// Kind of thing.
    pub category: ThingCategory,
    /// Material, if any.
    pub stuff: Option<String>,
}

/// A single map mutation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementInstruction {
    /// Terrain change.
    SetTerrain(TerrainPlacement),
    /// Thing spawn.
    Spawn(ThingPlacement),
}

impl PlacementInstruction {
    /// Target cell.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        match self {
            Self::SetTerrain(t) => t.cell,
            Self::Spawn(s) => s.cell,
        }
    }

    /// Whether this is a terrain instruction.
    #[must_use]
    pub const fn is_terrain(&self) -> bool {
        matches!(self, Self::SetTerrain(_))
    }

    /// Same instruction moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut moved = self.clone();
        match &mut moved {
            Self::SetTerrain(t) => t.cell = t.cell + (dx, dy),
            Self::Spawn(s) => s.cell = s.cell + (dx, dy),
        }
        moved
    }
}

/// Host map services consumed by generation.
pub trait StructureMap {
    /// Default anchor for centering structures.
    fn center(&self) -> Cell;

    /// Replace the terrain of a cell.
    fn set_terrain(&mut self, placement: &TerrainPlacement);

    /// Spawn a thing.
    fn spawn(&mut self, placement: &ThingPlacement);

    /// Apply any instruction.
    fn apply(&mut self, instruction: &PlacementInstruction) {
        match instruction {
            PlacementInstruction::SetTerrain(t) => self.set_terrain(t),
            PlacementInstruction::Spawn(s) => self.spawn(s),
        }
    }
}
