//! Error types for structure generation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`StructureError`].
pub type Result<T> = std::result::Result<T, StructureError>;

/// Identifies one grid of a layout definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerId {
    /// The terrain grid.
    Terrain,
    /// A content variant, by declaration index (0-based).
    Content(usize),
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain => write!(f, "terrain grid"),
            Self::Content(index) => write!(f, "layout #{}", index + 1),
        }
    }
}

/// Top-level error type for all structure generation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Grid rows disagree on width, a grid is missing, or a token is malformed.
    #[error("Malformed layout '{layout}': {reason}")]
    MalformedLayout {
        /// Layout definition name.
        layout: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A token has no entry in the symbol table.
    #[error("Unknown symbol '{token}' in '{layout}' {layer} at column {column}, row {row}")]
    UnknownSymbol {
        /// Layout definition name.
        layout: String,
        /// Grid containing the token.
        layer: LayerId,
        /// The unresolved token.
        token: String,
        /// Grid-local column of the token.
        column: u32,
        /// Grid-local row of the token.
        row: u32,
    },

    /// A grid does not fit the region computed for its layout.
    #[error(
        "Region mismatch in '{layout}' {layer}: grid {grid_width}x{grid_height} \
         exceeds region {region_width}x{region_height}"
    )]
    RegionMismatch {
        /// Layout definition name.
        layout: String,
        /// Grid that overflowed.
        layer: LayerId,
        /// Resolved grid width reached when the overflow was detected.
        grid_width: u32,
        /// Grid row count.
        grid_height: u32,
        /// Region width.
        region_width: u32,
        /// Region height.
        region_height: u32,
    },

    /// A symbol resolved to a rule that does not belong on this layer.
    #[error(
        "Symbol '{token}' in '{layout}' {layer} at column {column}, row {row} \
         is not a {expected} symbol"
    )]
    LayerMismatch {
        /// Layout definition name.
        layout: String,
        /// Grid containing the token.
        layer: LayerId,
        /// The offending token.
        token: String,
        /// Grid-local column of the token.
        column: u32,
        /// Grid-local row of the token.
        row: u32,
        /// Kind of symbol the layer accepts.
        expected: &'static str,
    },

    /// Generation was requested with no layouts registered.
    #[error("Layout catalog is empty")]
    EmptyCatalog,

    /// A layout with the same name is already registered.
    #[error("Duplicate layout name: {0}")]
    DuplicateLayout(String),

    /// A symbol with the same token is already registered.
    #[error("Duplicate symbol token: '{0}'")]
    DuplicateSymbol(String),

    /// Content definition text failed to parse.
    #[error("Failed to parse definition: {0}")]
    ParseError(String),
}

impl StructureError {
    /// Shorthand for a [`StructureError::MalformedLayout`].
    pub fn malformed(layout: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLayout {
            layout: layout.to_string(),
            reason: reason.into(),
        }
    }
}
