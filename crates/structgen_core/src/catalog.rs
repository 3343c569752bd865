//! Registry of layout definitions available to generation.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dimension::{grid_dimensions, resolve_dimensions};
use crate::error::{LayerId, Result, StructureError};
use crate::grid::GridCells;
use crate::layout::LayoutDefinition;
use crate::region::{Cell, Region};
use crate::room::UnknownSymbolPolicy;
use crate::symbol::{PlacementRule, SymbolResolver};

/// Layout definitions registered during content loading.
///
/// Filled once, then shared read-only by every generation event.
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog {
    layouts: Vec<LayoutDefinition>,
    by_name: HashMap<String, usize>,
}

impl LayoutCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layouts: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a layout definition.
    ///
    /// # Errors
    ///
    /// Returns an error if a layout with the same name is already registered.
    pub fn register(&mut self, def: LayoutDefinition) -> Result<()> {
        if self.by_name.contains_key(&def.name) {
            return Err(StructureError::DuplicateLayout(def.name));
        }
        self.by_name.insert(def.name.clone(), self.layouts.len());
        self.layouts.push(def);
        Ok(())
    }

    /// Get a layout by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&LayoutDefinition> {
        self.by_name.get(name).map(|&i| &self.layouts[i])
    }

    /// Check if a layout is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All layouts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutDefinition> {
        self.layouts.iter()
    }

    /// Get the number of registered layouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Pick one layout uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyCatalog`] if nothing is registered.
    pub fn choose<G: Rng + ?Sized>(&self, rng: &mut G) -> Result<&LayoutDefinition> {
        self.layouts.choose(rng).ok_or(StructureError::EmptyCatalog)
    }

    /// Check every layout without touching a map.
    ///
    /// Returns one error per failing layer: dimensions must resolve, every
    /// layer must fit the footprint and every token must resolve to a rule
    /// of the right kind for its layer.
    pub fn validate<R: SymbolResolver + ?Sized>(&self, resolver: &R) -> Vec<StructureError> {
        let mut errors = Vec::new();
        for def in &self.layouts {
            let dims = match resolve_dimensions(def, resolver) {
                Ok(dims) => dims,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            let footprint = Region::new(Cell::default(), dims.width, dims.height);
            for (layer, rows) in def.layers() {
                if let Err(err) = check_layer(&def.name, layer, rows, resolver, footprint) {
                    errors.push(err);
                }
            }
        }
        tracing::debug!(
            layouts = self.layouts.len(),
            errors = errors.len(),
            "Validated layout catalog"
        );
        errors
    }
}

fn check_layer<R: SymbolResolver + ?Sized>(
    layout: &str,
    layer: LayerId,
    rows: &[String],
    resolver: &R,
    footprint: Region,
) -> Result<()> {
    grid_dimensions(layout, layer, rows, resolver, UnknownSymbolPolicy::Abort)?;
    let wants_terrain = layer == LayerId::Terrain;
    for cell in GridCells::within(layout, layer, rows, resolver, footprint)? {
        let cell = cell?;
        let fits = match cell.rule {
            PlacementRule::Empty => true,
            PlacementRule::Terrain { .. } => wants_terrain,
            PlacementRule::Thing { .. } => !wants_terrain,
        };
        if !fits {
            return Err(StructureError::LayerMismatch {
                layout: layout.to_string(),
                layer,
                token: cell.token.raw.to_string(),
                column: cell.column,
                row: cell.row,
                expected: if wants_terrain { "terrain" } else { "thing" },
            });
        }
    }
    Ok(())
}
