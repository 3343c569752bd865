//! Test fixtures and helpers.
//!
//! Pre-built symbol tables, layouts and a recording map
//! for consistent testing.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use structgen_core::prelude::*;

/// Build owned rows from string literals.
#[must_use]
pub fn rows(rows: &[&str]) -> Vec<String> {
    rows.iter().map(|r| (*r).to_string()).collect()
}

/// Seeded RNG used by every test that needs randomness.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Symbol table covering the sample layouts.
///
/// | Token | Rule |
/// |-------|------|
/// | `.` | empty |
/// | `S` | Sand terrain |
/// | `F` | WoodFloor terrain |
/// | `#` | Wall (Steel) |
/// | `@` | Armchair |
/// | `D` / `Door` | Door |
/// | `bed` | DoubleBed, 2 cells wide, facing south |
/// | `m` | Muffalo spawner |
/// | `$` | Silver item |
///
/// # Panics
///
/// Never: the tokens are distinct.
#[must_use]
pub fn sample_symbols() -> SymbolTable {
    let defs = vec![
        SymbolDef {
            token: "S".to_string(),
            rule: PlacementRule::terrain("Sand"),
        },
        SymbolDef {
            token: "F".to_string(),
            rule: PlacementRule::terrain("WoodFloor"),
        },
        SymbolDef {
            token: "#".to_string(),
            rule: PlacementRule::Thing {
                prototype: "Wall".to_string(),
                rotation: Rotation::North,
                category: ThingCategory::Building,
                stuff: Some("Steel".to_string()),
                width: 1,
            },
        },
        SymbolDef {
            token: "@".to_string(),
            rule: PlacementRule::thing("Armchair"),
        },
        SymbolDef {
            token: "D".to_string(),
            rule: PlacementRule::thing("Door"),
        },
        SymbolDef {
            token: "Door".to_string(),
            rule: PlacementRule::thing("Door"),
        },
        SymbolDef {
            token: "bed".to_string(),
            rule: PlacementRule::Thing {
                prototype: "DoubleBed".to_string(),
                rotation: Rotation::South,
                category: ThingCategory::Building,
                stuff: None,
                width: 2,
            },
        },
        SymbolDef {
            token: "m".to_string(),
            rule: PlacementRule::Thing {
                prototype: "Muffalo".to_string(),
                rotation: Rotation::North,
                category: ThingCategory::Pawn,
                stuff: None,
                width: 1,
            },
        },
        SymbolDef {
            token: "$".to_string(),
            rule: PlacementRule::Thing {
                prototype: "Silver".to_string(),
                rotation: Rotation::North,
                category: ThingCategory::Item,
                stuff: None,
                width: 1,
            },
        },
    ];
    SymbolTable::from_defs(defs).expect("sample symbols are distinct")
}

/// The "Outpost" layout: 2x2 sand, a wall down the left column.
#[must_use]
pub fn outpost_layout() -> LayoutDefinition {
    LayoutDefinition::new("Outpost", vec![rows(&["#.", "#."])]).with_terrain(rows(&["SS", "SS"]))
}

/// A 5x4 cabin: floor terrain, a walled shell with a door, then furniture
/// and loot on a second layer written in comma form.
#[must_use]
pub fn cabin_layout() -> LayoutDefinition {
    LayoutDefinition::new(
        "Cabin",
        vec![
            rows(&["#####", "#...#", "#...#", "##D##"]),
            rows(&[
                "., ., ., ., .",
                "., bed, @, .",
                "., $, ., m, .",
                "., ., ., ., .",
            ]),
        ],
    )
    .with_terrain(rows(&["FFFFF", "FFFFF", "FFFFF", "FFFFF"]))
}

/// Catalog holding [`outpost_layout`] and [`cabin_layout`].
///
/// # Panics
///
/// Never: the names are distinct.
#[must_use]
pub fn sample_catalog() -> LayoutCatalog {
    let mut catalog = LayoutCatalog::new();
    catalog.register(outpost_layout()).expect("fresh catalog");
    catalog.register(cabin_layout()).expect("distinct names");
    catalog
}

/// In-memory map that records every mutation.
#[derive(Debug, Clone, Default)]
pub struct RecordingMap {
    /// Cell returned by [`StructureMap::center`].
    pub center: Cell,
    /// Current terrain per cell.
    pub terrain: HashMap<Cell, String>,
    /// Spawned things in spawn order.
    pub things: Vec<ThingPlacement>,
    /// Every instruction in application order.
    pub log: Vec<PlacementInstruction>,
}

impl RecordingMap {
    /// Empty map centered on `center`.
    #[must_use]
    pub fn centered_on(center: Cell) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Whether nothing has been applied.
    #[must_use]
    pub fn is_untouched(&self) -> bool {
        self.log.is_empty()
    }

    /// Prototypes spawned at `cell`, in spawn order.
    #[must_use]
    pub fn things_at(&self, cell: Cell) -> Vec<&str> {
        self.things
            .iter()
            .filter(|t| t.cell == cell)
            .map(|t| t.prototype.as_str())
            .collect()
    }
}

impl StructureMap for RecordingMap {
    fn center(&self) -> Cell {
        self.center
    }

    fn set_terrain(&mut self, placement: &TerrainPlacement) {
        self.terrain
            .insert(placement.cell, placement.terrain.clone());
        self.log
            .push(PlacementInstruction::SetTerrain(placement.clone()));
    }

    fn spawn(&mut self, placement: &ThingPlacement) {
        self.things.push(placement.clone());
        self.log.push(PlacementInstruction::Spawn(placement.clone()));
    }
}
