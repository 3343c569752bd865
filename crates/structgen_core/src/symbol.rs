//! Symbol resolution: mapping layout tokens to placement rules.
//!
//! A [`SymbolResolver`] is a pure lookup from a token to a
//! [`PlacementRule`]. [`SymbolTable`] is the data-driven implementation
//! populated from content definitions; closures work too, which keeps
//! tests free of any shared table.
//!
//! # Example RON
//!
//! ```ron
//! [
//!     SymbolDef(token: "#", rule: Thing(prototype: "Wall", category: Building, stuff: Some("Steel"))),
//!     SymbolDef(token: "S", rule: Terrain(terrain: "Sand")),
//!     SymbolDef(token: "bed", rule: Thing(prototype: "DoubleBed", rotation: East, width: 2)),
//! ]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, StructureError};

/// Token that every [`SymbolTable`] resolves to [`PlacementRule::Empty`].
pub const EMPTY_TOKEN: &str = ".";

/// Facing of a spawned thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// Facing north (the host's default facing).
    #[default]
    North,
    /// Facing east.
    East,
    /// Facing south.
    South,
    /// Facing west.
    West,
}

impl Rotation {
    /// Parse a rotation suffix: `N`/`E`/`S`/`W` (any case) or `0`..`3`.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "N" | "n" | "0" => Some(Self::North),
            "E" | "e" | "1" => Some(Self::East),
            "S" | "s" | "2" => Some(Self::South),
            "W" | "w" | "3" => Some(Self::West),
            _ => None,
        }
    }
}

/// What kind of thing a symbol spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThingCategory {
    /// Walls, doors, furniture and other constructed things.
    #[default]
    Building,
    /// Loose items.
    Item,
    /// Creature spawners.
    Pawn,
}

/// How a single token is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementRule {
    /// Nothing is placed; existing terrain and things are left alone.
    Empty,
    /// Set the cell's terrain.
    Terrain {
        /// Host terrain identifier.
        terrain: String,
    },
    /// Spawn a thing.
    Thing {
        /// Host prototype identifier.
        prototype: String,
        /// Default facing, overridable by the token's extended form.
        #[serde(default)]
        rotation: Rotation,
        /// Kind of thing.
        #[serde(default)]
        category: ThingCategory,
        /// Optional material the thing is made from.
        #[serde(default)]
        stuff: Option<String>,
        /// Grid columns covered by one token (multi-cell prototypes).
        #[serde(default = "default_width")]
        width: u32,
    },
}

/// Default token width for thing symbols.
const fn default_width() -> u32 {
    1
}

impl PlacementRule {
    /// A single-cell building with default rotation and no stuff.
    pub fn thing(prototype: impl Into<String>) -> Self {
        Self::Thing {
            prototype: prototype.into(),
            rotation: Rotation::North,
            category: ThingCategory::Building,
            stuff: None,
            width: 1,
        }
    }

    /// A terrain rule.
    pub fn terrain(terrain: impl Into<String>) -> Self {
        Self::Terrain {
            terrain: terrain.into(),
        }
    }

    /// Grid columns covered by a token resolving to this rule.
    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Thing { width, .. } => (*width).max(1),
            Self::Empty | Self::Terrain { .. } => 1,
        }
    }

    /// Whether this rule places nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// The resolver could not find a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown symbol '{0}'")]
pub struct UnknownSymbol(pub String);

/// Pure token lookup injected into the painters and builders.
pub trait SymbolResolver {
    /// Resolve a bare symbol name (rotation suffix already stripped).
    fn resolve(&self, token: &str) -> std::result::Result<PlacementRule, UnknownSymbol>;
}

impl<F> SymbolResolver for F
where
    F: Fn(&str) -> std::result::Result<PlacementRule, UnknownSymbol>,
{
    fn resolve(&self, token: &str) -> std::result::Result<PlacementRule, UnknownSymbol> {
        self(token)
    }
}

/// Serializable symbol definition, as authored in content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Token as it appears in layout rows.
    pub token: String,
    /// What the token places.
    pub rule: PlacementRule,
}

/// Data-driven symbol table.
///
/// Built once during content loading and shared read-only by every
/// generation event.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, PlacementRule>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a table containing only [`EMPTY_TOKEN`].
    #[must_use]
    pub fn new() -> Self {
        let mut symbols = HashMap::new();
        symbols.insert(EMPTY_TOKEN.to_string(), PlacementRule::Empty);
        Self { symbols }
    }

    /// Build a table from authored definitions.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateSymbol`] if two definitions share a token.
    pub fn from_defs(defs: impl IntoIterator<Item = SymbolDef>) -> Result<Self> {
        let mut table = Self::new();
        for def in defs {
            table.register(def.token, def.rule)?;
        }
        Ok(table)
    }

    /// Parse a RON list of [`SymbolDef`] and build a table from it.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ParseError`] or a duplicate-token error.
    pub fn from_ron(source: &str) -> Result<Self> {
        let defs: Vec<SymbolDef> =
            ron::from_str(source).map_err(|e| StructureError::ParseError(e.to_string()))?;
        Self::from_defs(defs)
    }

    /// Register a symbol.
    ///
    /// [`EMPTY_TOKEN`] may be redefined once; any other token only once.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::DuplicateSymbol`] if the token is already taken.
    pub fn register(&mut self, token: impl Into<String>, rule: PlacementRule) -> Result<()> {
        let token = token.into();
        match self.symbols.get(&token) {
            Some(PlacementRule::Empty) if token == EMPTY_TOKEN => {}
            Some(_) => return Err(StructureError::DuplicateSymbol(token)),
            None => {}
        }
        self.symbols.insert(token, rule);
        Ok(())
    }

    /// Look up a symbol without cloning.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<&PlacementRule> {
        self.symbols.get(token)
    }

    /// Number of registered symbols, including [`EMPTY_TOKEN`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table has no symbols at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, token: &str) -> std::result::Result<PlacementRule, UnknownSymbol> {
        self.symbols
            .get(token)
            .cloned()
            .ok_or_else(|| UnknownSymbol(token.to_string()))
    }
}
