//! Terrain painting: terrain grid to terrain instructions.

use crate::error::{LayerId, Result, StructureError};
use crate::grid::GridCells;
use crate::instruction::{PlacementInstruction, TerrainPlacement};
use crate::region::Region;
use crate::symbol::{PlacementRule, SymbolResolver};

/// Paints a terrain grid onto a region.
#[derive(Debug)]
pub struct TerrainPainter<'a, R: ?Sized> {
    resolver: &'a R,
    region: Region,
}

impl<'a, R: SymbolResolver + ?Sized> TerrainPainter<'a, R> {
    /// Create a painter for `region`.
    pub fn new(resolver: &'a R, region: Region) -> Self {
        Self { resolver, region }
    }

    /// Lazily produce one terrain instruction per non-empty cell of `rows`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::RegionMismatch`] immediately if the grid has
    /// more rows than the region. Later problems are yielded by the iterator,
    /// which stops after the first one.
    pub fn paint(&self, layout: &'a str, rows: &'a [String]) -> Result<TerrainInstructions<'a, R>> {
        let cells = GridCells::within(layout, LayerId::Terrain, rows, self.resolver, self.region)?;
        Ok(TerrainInstructions {
            cells,
            layout,
            region: self.region,
            failed: false,
        })
    }
}

/// Iterator returned by [`TerrainPainter::paint`].
pub struct TerrainInstructions<'a, R: ?Sized> {
    cells: GridCells<'a, R>,
    layout: &'a str,
    region: Region,
    failed: bool,
}

impl<'a, R: SymbolResolver + ?Sized> Iterator for TerrainInstructions<'a, R> {
    type Item = Result<PlacementInstruction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let cell = match self.cells.next()? {
                Ok(cell) => cell,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            };
            match cell.rule {
                PlacementRule::Empty => continue,
                PlacementRule::Terrain { terrain } => {
                    return Some(Ok(PlacementInstruction::SetTerrain(TerrainPlacement {
                        cell: self.region.cell_at(cell.column, cell.row),
                        terrain,
                    })));
                }
                PlacementRule::Thing { .. } => {
                    self.failed = true;
                    return Some(Err(StructureError::LayerMismatch {
                        layout: self.layout.to_string(),
                        layer: LayerId::Terrain,
                        token: cell.token.raw.to_string(),
                        column: cell.column,
                        row: cell.row,
                        expected: "terrain",
                    }));
                }
            }
        }
    }
}
