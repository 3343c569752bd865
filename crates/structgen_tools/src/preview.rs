//! ASCII preview of a planned structure.
//!
//! Renders the instructions of one generation event as a character grid
//! for quick terminal review of authored layouts.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use structgen_core::prelude::*;
use thiserror::Error;

use crate::loader::ContentSet;

/// Errors that can occur while planning a preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The requested layout is not in the catalog.
    #[error("No layout named '{0}'")]
    UnknownLayout(String),

    /// Generation rejected the layout.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// One planned generation event, ready to print or dump as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    /// Layout that was planned.
    pub layout: String,
    /// Footprint on the map.
    pub region: Region,
    /// Instructions in application order.
    pub instructions: Vec<PlacementInstruction>,
}

/// Plan one event from `content` without a map.
///
/// With `layout` set, that layout is used instead of a seeded pick.
/// The anchor is the config's fixed anchor if any, else `(0, 0)`.
///
/// # Errors
///
/// Returns an error if the layout is unknown or fails to generate.
pub fn plan_preview(
    content: &ContentSet,
    layout: Option<&str>,
    seed: u64,
    config: &GenStepConfig,
) -> std::result::Result<Preview, PreviewError> {
    let anchor = match config.anchor {
        Anchor::Fixed(cell) => cell,
        Anchor::MapCenter => Cell::default(),
    };

    let event = match layout {
        Some(name) => {
            let def = content
                .catalog
                .get(name)
                .ok_or_else(|| PreviewError::UnknownLayout(name.to_string()))?;
            GenerationEvent::new(def, &content.symbols, anchor, config.unknown_symbols)?
        }
        None => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            StructureGenStep::new(&content.catalog, &content.symbols)
                .with_config(config.clone())
                .plan(anchor, &mut rng)?
        }
    };

    let instructions = event
        .instructions(&content.symbols, config.unknown_symbols)
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        layout = %event.layout.name,
        instructions = instructions.len(),
        "Planned preview"
    );

    Ok(Preview {
        layout: event.layout.name.clone(),
        region: event.region,
        instructions,
    })
}

/// Preview configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Append a legend mapping characters to prototypes and terrain.
    pub show_legend: bool,
    /// Print map coordinates of the region's corners.
    pub show_bounds: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_bounds: true,
        }
    }
}

/// Character shown for a cell with nothing on it.
const BLANK: char = ' ';

/// Things are drawn uppercase, terrain lowercase.
fn glyph(name: &str, thing: bool) -> char {
    let first = name.chars().next().unwrap_or('?');
    if thing {
        first.to_ascii_uppercase()
    } else {
        first.to_ascii_lowercase()
    }
}

/// What ends up visible on one cell: the last thing, else the terrain.
#[derive(Debug, Default, Clone)]
struct CellView<'a> {
    terrain: Option<&'a str>,
    thing: Option<&'a str>,
}

/// Render `instructions` over `region`.
///
/// Instructions outside the region are ignored. Row 0 is printed first, so
/// the output reads the same way as the authored grid.
#[must_use]
pub fn render(region: &Region, instructions: &[PlacementInstruction], config: &PreviewConfig) -> String {
    let mut cells: BTreeMap<Cell, CellView<'_>> = BTreeMap::new();
    let mut legend: BTreeMap<char, Vec<&str>> = BTreeMap::new();

    for instruction in instructions {
        if !region.contains(instruction.cell()) {
            continue;
        }
        let view = cells.entry(instruction.cell()).or_default();
        let (name, thing) = match instruction {
            PlacementInstruction::SetTerrain(t) => {
                view.terrain = Some(t.terrain.as_str());
                (t.terrain.as_str(), false)
            }
            PlacementInstruction::Spawn(s) => {
                view.thing = Some(s.prototype.as_str());
                (s.prototype.as_str(), true)
            }
        };
        let names = legend.entry(glyph(name, thing)).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut out = String::new();
    let border = "-".repeat(region.width as usize);
    let _ = writeln!(out, "+{border}+");
    for row in 0..region.height {
        out.push('|');
        for column in 0..region.width {
            let ch = match cells.get(&region.cell_at(column, row)) {
                Some(CellView {
                    thing: Some(name), ..
                }) => glyph(name, true),
                Some(CellView {
                    terrain: Some(name),
                    ..
                }) => glyph(name, false),
                _ => BLANK,
            };
            out.push(ch);
        }
        out.push_str("|\n");
    }
    let _ = writeln!(out, "+{border}+");

    if config.show_bounds {
        let last = region.cell_at(region.width.saturating_sub(1), region.height.saturating_sub(1));
        let _ = writeln!(
            out,
            "({}, {}) .. ({}, {})  {}x{}",
            region.origin.x, region.origin.y, last.x, last.y, region.width, region.height
        );
    }

    if config.show_legend && !legend.is_empty() {
        out.push_str("Legend:\n");
        for (ch, names) in &legend {
            let _ = writeln!(out, "  {ch} = {}", names.join(", "));
        }
    }

    out
}
