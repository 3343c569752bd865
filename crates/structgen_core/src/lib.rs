//! # Structgen Core
//!
//! Custom structure generation: turns symbolic layout grids into
//! placement instructions on a 2D map.
//!
//! This crate contains **only** deterministic logic:
//! - No IO (content is loaded by `structgen_tools` or the host)
//! - No ambient randomness (an `rand::Rng` is always passed in)
//! - No global state (catalog and symbol table are explicit registries)
//!
//! ## Crate Structure
//!
//! - [`layout`] / [`catalog`] - Layout definitions and their registry
//! - [`symbol`] / [`token`] - Token parsing and symbol resolution
//! - [`dimension`] / [`region`] - Footprint size and placement
//! - [`terrain`] / [`room`] - Terrain and content layer instruction streams
//! - [`genstep`] - The generation step that ties it all together

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod dimension;
pub mod error;
pub mod genstep;
pub mod grid;
pub mod instruction;
pub mod layout;
pub mod region;
pub mod room;
pub mod symbol;
pub mod terrain;
pub mod token;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::LayoutCatalog;
    pub use crate::dimension::{measure_layout, resolve_dimensions, Dimensions};
    pub use crate::error::{LayerId, Result, StructureError};
    pub use crate::genstep::{
        Anchor, ApplyMode, GenStepConfig, GenerationEvent, GenerationReport, StructureGenStep,
        SEED_PART,
    };
    pub use crate::instruction::{
        PlacementInstruction, StructureMap, TerrainPlacement, ThingPlacement,
    };
    pub use crate::layout::LayoutDefinition;
    pub use crate::region::{Cell, Region};
    pub use crate::room::{RoomBuilder, UnknownSymbolPolicy};
    pub use crate::symbol::{
        PlacementRule, Rotation, SymbolDef, SymbolResolver, SymbolTable, ThingCategory,
        UnknownSymbol,
    };
    pub use crate::terrain::TerrainPainter;
}
