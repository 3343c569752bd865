//! Cursor over the resolved cells of one token grid.
//!
//! Shared by the dimension resolver, terrain painter and room builder so
//! that all three agree on tokenization, multi-cell widths and bounds.

use crate::error::{LayerId, Result, StructureError};
use crate::region::Region;
use crate::room::UnknownSymbolPolicy;
use crate::symbol::{PlacementRule, SymbolResolver};
use crate::token::{split_row, Token};

/// One token after resolution, in grid-local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCell<'a> {
    /// First column covered by the token.
    pub column: u32,
    /// First column after the token.
    pub end: u32,
    /// Row of the token.
    pub row: u32,
    /// The parsed token.
    pub token: Token<'a>,
    /// What the token places.
    pub rule: PlacementRule,
}

/// Lazy walk over a grid, row by row, left to right.
///
/// Unknown symbols are yielded as errors and the cursor moves one column
/// on, so callers may skip them. Any other error ends the walk.
pub struct GridCells<'a, R: ?Sized> {
    layout: &'a str,
    layer: LayerId,
    rows: &'a [String],
    resolver: &'a R,
    bounds: Option<Region>,
    next_row: usize,
    tokens: std::vec::IntoIter<&'a str>,
    column: u32,
    finished: bool,
}

impl<'a, R: SymbolResolver + ?Sized> GridCells<'a, R> {
    /// Walk `rows` without any bounds.
    pub fn new(layout: &'a str, layer: LayerId, rows: &'a [String], resolver: &'a R) -> Self {
        Self {
            layout,
            layer,
            rows,
            resolver,
            bounds: None,
            next_row: 0,
            tokens: Vec::new().into_iter(),
            column: 0,
            finished: false,
        }
    }

    /// Walk `rows`, failing on any token that would fall outside `region`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::RegionMismatch`] up front if the grid has
    /// more rows than the region.
    pub fn within(
        layout: &'a str,
        layer: LayerId,
        rows: &'a [String],
        resolver: &'a R,
        region: Region,
    ) -> Result<Self> {
        let mut cells = Self::new(layout, layer, rows, resolver);
        if grid_height(rows) > region.height {
            return Err(cells.region_mismatch(region, 0));
        }
        cells.bounds = Some(region);
        Ok(cells)
    }

    /// Grid row currently being walked.
    fn current_row(&self) -> u32 {
        u32::try_from(self.next_row.saturating_sub(1)).unwrap_or(u32::MAX)
    }

    fn region_mismatch(&self, region: Region, grid_width: u32) -> StructureError {
        StructureError::RegionMismatch {
            layout: self.layout.to_string(),
            layer: self.layer,
            grid_width,
            grid_height: grid_height(self.rows),
            region_width: region.width,
            region_height: region.height,
        }
    }

    fn malformed(&self, detail: impl std::fmt::Display) -> StructureError {
        StructureError::malformed(
            self.layout,
            format!(
                "{} row {}, column {}: {detail}",
                self.layer,
                self.current_row(),
                self.column
            ),
        )
    }

    fn resolve_token(&mut self, raw: &'a str) -> Result<ResolvedCell<'a>> {
        let token = Token::parse(raw).map_err(|e| self.malformed(e))?;
        let column = self.column;
        let row = self.current_row();

        let rule = match self.resolver.resolve(token.symbol) {
            Ok(rule) => rule,
            Err(_) => {
                self.column = column
                    .checked_add(1)
                    .ok_or_else(|| self.malformed("row is too wide"))?;
                return Err(StructureError::UnknownSymbol {
                    layout: self.layout.to_string(),
                    layer: self.layer,
                    token: raw.to_string(),
                    column,
                    row,
                });
            }
        };

        if token.rotation.is_some() && !matches!(rule, PlacementRule::Thing { .. }) {
            return Err(self.malformed(format_args!(
                "rotation suffix on non-thing symbol '{}'",
                token.symbol
            )));
        }

        let end = column
            .checked_add(rule.width())
            .ok_or_else(|| self.malformed(format_args!("'{}' overflows the row", token.symbol)))?;
        if let Some(region) = self.bounds {
            if end > region.width {
                return Err(self.region_mismatch(region, end));
            }
        }
        self.column = end;

        Ok(ResolvedCell {
            column,
            end,
            row,
            token,
            rule,
        })
    }
}

impl<'a, R: SymbolResolver + ?Sized> Iterator for GridCells<'a, R> {
    type Item = Result<ResolvedCell<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if let Some(raw) = self.tokens.next() {
                let result = self.resolve_token(raw);
                if let Err(err) = &result {
                    if !matches!(err, StructureError::UnknownSymbol { .. }) {
                        self.finished = true;
                    }
                }
                return Some(result);
            }
            let Some(row) = self.rows.get(self.next_row) else {
                self.finished = true;
                return None;
            };
            self.tokens = split_row(row).into_iter();
            self.next_row += 1;
            self.column = 0;
        }
    }
}

/// Row count of a grid as `u32`.
#[must_use]
pub fn grid_height(rows: &[String]) -> u32 {
    u32::try_from(rows.len()).unwrap_or(u32::MAX)
}

/// Resolved width of every row, in order.
///
/// Under [`UnknownSymbolPolicy::Skip`] an unknown token counts as one
/// empty column, the same as when it is built.
///
/// # Errors
///
/// Fails on the first malformed token, and on the first unknown symbol
/// unless `policy` skips them.
pub fn row_widths<R: SymbolResolver + ?Sized>(
    layout: &str,
    layer: LayerId,
    rows: &[String],
    resolver: &R,
    policy: UnknownSymbolPolicy,
) -> Result<Vec<u32>> {
    let mut widths = vec![0u32; rows.len()];
    for cell in GridCells::new(layout, layer, rows, resolver) {
        let (row, end) = match cell {
            Ok(cell) => (cell.row, cell.end),
            Err(StructureError::UnknownSymbol { column, row, .. })
                if policy == UnknownSymbolPolicy::Skip =>
            {
                (row, column.saturating_add(1))
            }
            Err(err) => return Err(err),
        };
        if let Some(width) = widths.get_mut(row as usize) {
            *width = (*width).max(end);
        }
    }
    Ok(widths)
}
