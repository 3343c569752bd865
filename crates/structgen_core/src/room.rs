//! Room building: content layers to thing instructions.
//!
//! Each content layer of a definition is built against the same region,
//! so layers stack: a floor plan, then furniture, then decoration.

use serde::{Deserialize, Serialize};

use crate::error::{LayerId, Result, StructureError};
use crate::grid::GridCells;
use crate::instruction::{PlacementInstruction, ThingPlacement};
use crate::region::Region;
use crate::symbol::{PlacementRule, SymbolResolver};

/// What to do when a content token has no symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownSymbolPolicy {
    /// Stop generation with [`StructureError::UnknownSymbol`].
    #[default]
    Abort,
    /// Log a warning, leave the cell empty and carry on.
    Skip,
}

/// Builds content layers onto a region.
#[derive(Debug)]
pub struct RoomBuilder<'a, R: ?Sized> {
    resolver: &'a R,
    region: Region,
    policy: UnknownSymbolPolicy,
}

impl<'a, R: SymbolResolver + ?Sized> RoomBuilder<'a, R> {
    /// Create a builder for `region` that aborts on unknown symbols.
    pub fn new(resolver: &'a R, region: Region) -> Self {
        Self {
            resolver,
            region,
            policy: UnknownSymbolPolicy::Abort,
        }
    }

    /// Set the unknown-symbol policy.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownSymbolPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Lazily produce one spawn per non-empty token of content layer `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::RegionMismatch`] immediately if the layer
    /// has more rows than the region. Later problems are yielded by the
    /// iterator, which stops after the first one.
    pub fn build(
        &self,
        layout: &'a str,
        index: usize,
        rows: &'a [String],
    ) -> Result<RoomInstructions<'a, R>> {
        let layer = LayerId::Content(index);
        let cells = GridCells::within(layout, layer, rows, self.resolver, self.region)?;
        Ok(RoomInstructions {
            cells,
            layout,
            layer,
            region: self.region,
            policy: self.policy,
            failed: false,
        })
    }
}

/// Iterator returned by [`RoomBuilder::build`].
pub struct RoomInstructions<'a, R: ?Sized> {
    cells: GridCells<'a, R>,
    layout: &'a str,
    layer: LayerId,
    region: Region,
    policy: UnknownSymbolPolicy,
    failed: bool,
}

impl<'a, R: SymbolResolver + ?Sized> Iterator for RoomInstructions<'a, R> {
    type Item = Result<PlacementInstruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let cell = match self.cells.next()? {
                Ok(cell) => cell,
                Err(StructureError::UnknownSymbol {
                    token, column, row, ..
                }) if self.policy == UnknownSymbolPolicy::Skip => {
                    tracing::warn!(
                        layout = self.layout,
                        layer = %self.layer,
                        token = %token,
                        column,
                        row,
                        "Skipping unknown symbol"
                    );
                    continue;
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            };
            match cell.rule {
                PlacementRule::Empty => continue,
                PlacementRule::Thing {
                    prototype,
                    rotation,
                    category,
                    stuff,
                    ..
                } => {
                    return Some(Ok(PlacementInstruction::Spawn(ThingPlacement {
                        cell: self.region.cell_at(cell.column, cell.row),
                        prototype,
                        rotation: cell.token.rotation.unwrap_or(rotation),
                        category,
                        stuff,
                    })));
                }
                PlacementRule::Terrain { .. } => {
                    self.failed = true;
                    return Some(Err(StructureError::LayerMismatch {
                        layout: self.layout.to_string(),
                        layer: self.layer,
                        token: cell.token.raw.to_string(),
                        column: cell.column,
                        row: cell.row,
                        expected: "thing",
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Cell;
    use crate::symbol::{Rotation, SymbolTable, ThingCategory};

    fn rows(r: &[&str]) -> Vec<String> {
        r.iter().map(|s| (*s).to_string()).collect()
    }

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.register("#", PlacementRule::thing("Wall")).unwrap();
        table.register("@", PlacementRule::thing("Armchair")).unwrap();
        table.register("S", PlacementRule::terrain("Sand")).unwrap();
        table
            .register(
                "Door",
                PlacementRule::Thing {
                    prototype: "Door".to_string(),
                    rotation: Rotation::North,
                    category: ThingCategory::Building,
                    stuff: Some("Steel".to_string()),
                    width: 1,
                },
            )
            .unwrap();
        table
            .register(
                "bed",
                PlacementRule::Thing {
                    prototype: "DoubleBed".to_string(),
                    rotation: Rotation::South,
                    category: ThingCategory::Building,
                    stuff: None,
                    width: 2,
                },
            )
            .unwrap();
        table
    }

    fn spawns(out: &[PlacementInstruction]) -> Vec<(&str, Cell, Rotation)> {
        out.iter()
            .filter_map(|i| match i {
                PlacementInstruction::Spawn(s) => Some((s.prototype.as_str(), s.cell, s.rotation)),
                PlacementInstruction::SetTerrain(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_variants_stack_on_same_region() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 2, 1);
        let builder = RoomBuilder::new(&table, region);
        let first = rows(&["#."]);
        let second = rows(&[".@"]);

        let mut out: Vec<PlacementInstruction> = Vec::new();
        for (i, layer) in [&first, &second].into_iter().enumerate() {
            for instruction in builder.build("stack", i, layer).unwrap() {
                out.push(instruction.unwrap());
            }
        }

        assert_eq!(
            spawns(&out),
            vec![
                ("Wall", Cell::new(0, 0), Rotation::North),
                ("Armchair", Cell::new(1, 0), Rotation::North),
            ]
        );
    }

    #[test]
    fn test_rotation_override_and_stuff() {
        let table = table();
        let region = Region::new(Cell::new(10, 10), 3, 1);
        let grid = rows(&["#,Door:E,#"]);
        let out: Vec<_> = RoomBuilder::new(&table, region)
            .build("rot", 0, &grid)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(out.len(), 3);
        match &out[1] {
            PlacementInstruction::Spawn(door) => {
                assert_eq!(door.cell, Cell::new(11, 10));
                assert_eq!(door.rotation, Rotation::East);
                assert_eq!(door.stuff.as_deref(), Some("Steel"));
            }
            other => panic!("expected door spawn, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_cell_anchor_and_default_rotation() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 4, 1);
        let grid = rows(&["#,bed,#"]);
        let out: Vec<_> = RoomBuilder::new(&table, region)
            .build("beds", 0, &grid)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            spawns(&out),
            vec![
                ("Wall", Cell::new(0, 0), Rotation::North),
                ("DoubleBed", Cell::new(1, 0), Rotation::South),
                ("Wall", Cell::new(3, 0), Rotation::North),
            ]
        );
    }

    #[test]
    fn test_unknown_symbol_aborts_by_default() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 3, 1);
        let grid = rows(&["#X#"]);
        let results: Vec<_> = RoomBuilder::new(&table, region)
            .build("typo", 0, &grid)
            .unwrap()
            .collect();
        assert_eq!(results.len(), 2);
        match &results[1] {
            Err(StructureError::UnknownSymbol {
                token,
                column,
                row,
                layer,
                ..
            }) => {
                assert_eq!(token, "X");
                assert_eq!((*column, *row), (1, 0));
                assert_eq!(*layer, LayerId::Content(0));
            }
            other => panic!("expected unknown symbol, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_symbol_skip_policy() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 3, 1);
        let grid = rows(&["#X#"]);
        let out: Vec<_> = RoomBuilder::new(&table, region)
            .with_policy(UnknownSymbolPolicy::Skip)
            .build("typo", 0, &grid)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            spawns(&out),
            vec![
                ("Wall", Cell::new(0, 0), Rotation::North),
                ("Wall", Cell::new(2, 0), Rotation::North),
            ]
        );
    }

    #[test]
    fn test_terrain_symbol_in_content_layer() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 2, 1);
        let grid = rows(&["#S"]);
        let results: Vec<_> = RoomBuilder::new(&table, region)
            .build("mixed", 2, &grid)
            .unwrap()
            .collect();
        assert!(matches!(
            results.last(),
            Some(Err(StructureError::LayerMismatch {
                expected: "thing",
                layer: LayerId::Content(2),
                ..
            }))
        ));
    }

    #[test]
    fn test_layer_taller_than_region() {
        let table = table();
        let region = Region::new(Cell::new(0, 0), 1, 1);
        let grid = rows(&["#", "#"]);
        assert!(matches!(
            RoomBuilder::new(&table, region).build("tall", 0, &grid),
            Err(StructureError::RegionMismatch { .. })
        ));
    }
}
