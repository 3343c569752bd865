//! Property-based testing strategies.
//!
//! Grids are generated rectangular (every row the same width) from a
//! fixed alphabet that [`crate::fixtures::sample_symbols`] resolves.

use proptest::prelude::*;
use structgen_core::prelude::*;

/// Terrain alphabet: sand, wood floor, empty.
pub const TERRAIN_ALPHABET: &[char] = &['S', 'F', '.'];

/// Content alphabet: wall, armchair, door, spawner, item, empty.
pub const CONTENT_ALPHABET: &[char] = &['#', '@', 'D', 'm', '$', '.'];

/// Rectangular grid of single-character tokens.
pub fn grid(
    alphabet: &'static [char],
    max_height: usize,
    max_width: usize,
) -> impl Strategy<Value = Vec<String>> {
    (1..=max_height, 1..=max_width)
        .prop_flat_map(move |(height, width)| grid_of(alphabet, height, width))
}

/// Terrain grid plus `1..=max_layers` content layers of the same size.
pub fn layout(
    max_height: usize,
    max_width: usize,
    max_layers: usize,
) -> impl Strategy<Value = LayoutDefinition> {
    (1..=max_height, 1..=max_width, 1..=max_layers).prop_flat_map(
        move |(height, width, layers)| {
            let terrain = grid_of(TERRAIN_ALPHABET, height, width);
            let content = prop::collection::vec(grid_of(CONTENT_ALPHABET, height, width), layers);
            (terrain, content).prop_map(|(terrain, content)| {
                LayoutDefinition::new("Generated", content).with_terrain(terrain)
            })
        },
    )
}

/// Anchor anywhere on a large map, negative coordinates included.
pub fn anchor() -> impl Strategy<Value = Cell> {
    (-1000i32..1000, -1000i32..1000).prop_map(|(x, y)| Cell::new(x, y))
}

fn grid_of(
    alphabet: &'static [char],
    height: usize,
    width: usize,
) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(alphabet), width)
            .prop_map(|chars| chars.into_iter().collect::<String>()),
        height,
    )
}
