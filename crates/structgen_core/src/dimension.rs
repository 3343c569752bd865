//! Footprint size of a layout definition.

use serde::{Deserialize, Serialize};

use crate::error::{LayerId, Result, StructureError};
use crate::grid::{grid_height, row_widths};
use crate::layout::LayoutDefinition;
use crate::room::UnknownSymbolPolicy;
use crate::symbol::SymbolResolver;

/// Resolved size of a layout, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of rows.
    pub height: u32,
    /// Resolved column count.
    pub width: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }
}

/// Compute the footprint of `def` from its primary grid.
///
/// The primary grid is the terrain grid when present, else the first
/// content layer. Every row must resolve to the same width.
///
/// # Errors
///
/// Returns [`StructureError::MalformedLayout`] if the definition has no
/// content layers, the primary grid is empty, or its rows disagree on
/// width. Unknown symbols in the primary grid are reported as well.
pub fn resolve_dimensions<R: SymbolResolver + ?Sized>(
    def: &LayoutDefinition,
    resolver: &R,
) -> Result<Dimensions> {
    primary_dimensions(def, resolver, UnknownSymbolPolicy::Abort)
}

/// Measure every grid of `def` and return the footprint of its primary grid.
///
/// Content layers are measured under `policy`, so a skipped unknown token
/// counts as one empty column. Terrain tokens must always resolve.
///
/// # Errors
///
/// Everything [`resolve_dimensions`] rejects, plus empty or ragged rows in
/// any other layer.
pub fn measure_layout<R: SymbolResolver + ?Sized>(
    def: &LayoutDefinition,
    resolver: &R,
    policy: UnknownSymbolPolicy,
) -> Result<Dimensions> {
    let dims = primary_dimensions(def, resolver, policy)?;
    let primary = def.primary_grid().map(|(layer, _)| layer);
    for (layer, rows) in def.layers().filter(|(layer, _)| Some(*layer) != primary) {
        grid_dimensions(&def.name, layer, rows, resolver, layer_policy(layer, policy))?;
    }
    Ok(dims)
}

fn layer_policy(layer: LayerId, policy: UnknownSymbolPolicy) -> UnknownSymbolPolicy {
    match layer {
        LayerId::Terrain => UnknownSymbolPolicy::Abort,
        LayerId::Content(_) => policy,
    }
}

fn primary_dimensions<R: SymbolResolver + ?Sized>(
    def: &LayoutDefinition,
    resolver: &R,
    policy: UnknownSymbolPolicy,
) -> Result<Dimensions> {
    if def.layouts.is_empty() {
        return Err(StructureError::malformed(&def.name, "no content layouts"));
    }
    let Some((layer, rows)) = def.primary_grid() else {
        return Err(StructureError::malformed(&def.name, "no grid to measure"));
    };
    let dims = grid_dimensions(&def.name, layer, rows, resolver, layer_policy(layer, policy))?;
    tracing::debug!(
        layout = %def.name,
        height = dims.height,
        width = dims.width,
        "Resolved layout dimensions"
    );
    Ok(dims)
}

/// Measure a single grid.
///
/// # Errors
///
/// Returns [`StructureError::MalformedLayout`] if the grid has no rows,
/// resolves to zero width, or has rows of different widths.
pub fn grid_dimensions<R: SymbolResolver + ?Sized>(
    layout: &str,
    layer: LayerId,
    rows: &[String],
    resolver: &R,
    policy: UnknownSymbolPolicy,
) -> Result<Dimensions> {
    if rows.is_empty() {
        return Err(StructureError::malformed(layout, format!("{layer} has no rows")));
    }

    let widths = row_widths(layout, layer, rows, resolver, policy)?;
    let width = widths[0];
    if let Some((row, other)) = widths.iter().enumerate().find(|(_, w)| **w != width) {
        return Err(StructureError::malformed(
            layout,
            format!("{layer} row {row} is {other} cells wide, row 0 is {width}"),
        ));
    }
    if width == 0 {
        return Err(StructureError::malformed(layout, format!("{layer} has zero width")));
    }

    Ok(Dimensions::new(grid_height(rows), width))
}
