//! Determinism testing utilities.
//!
//! Provides a harness for verifying that generation produces identical
//! instruction streams given identical inputs.
//!
//! # Testing Strategy
//!
//! Structure generation must be reproducible from a seed. Sources of
//! non-determinism include:
//!
//! - **Ambient randomness**: the core never calls a global RNG. All
//!   selection goes through the `rand::Rng` handed to `generate`.
//!
//! - **HashMap iteration order**: the symbol table is only ever queried
//!   by key, and the catalog chooses from a `Vec` in registration order.
//!
//! - **Shared state**: catalog and symbol table are read-only during
//!   generation, so parallel events must agree with serial ones.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use structgen_core::prelude::*;

use crate::fixtures::{seeded_rng, RecordingMap};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Seed used for every run.
    pub seed: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic generation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that generation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if generation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Generation is non-deterministic!\n\
                 Runs: {}\n\
                 Seed: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.seed,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Hash an instruction sequence, order included.
#[must_use]
pub fn hash_instructions(instructions: &[PlacementInstruction]) -> u64 {
    let mut hasher = DefaultHasher::new();
    instructions.hash(&mut hasher);
    hasher.finish()
}

/// Move instructions into grid-local coordinates relative to `origin`.
#[must_use]
pub fn relative_to(instructions: &[PlacementInstruction], origin: Cell) -> Vec<PlacementInstruction> {
    instructions
        .iter()
        .map(|i| i.translated(-origin.x, -origin.y))
        .collect()
}

/// Run one generation event on a fresh [`RecordingMap`].
///
/// # Errors
///
/// Propagates any generation error.
pub fn generate_once<R: SymbolResolver + ?Sized>(
    catalog: &LayoutCatalog,
    resolver: &R,
    config: &GenStepConfig,
    center: Cell,
    seed: u64,
) -> Result<(GenerationReport, RecordingMap)> {
    let mut map = RecordingMap::centered_on(center);
    let mut rng = seeded_rng(seed);
    let report = StructureGenStep::new(catalog, resolver)
        .with_config(config.clone())
        .generate(&mut map, &mut rng)?;
    Ok((report, map))
}

/// Run generation `runs` times with the same seed and compare the logs.
///
/// Failed runs hash their error message instead, so a deterministic
/// failure still counts as deterministic.
pub fn verify_generation_determinism<R: SymbolResolver + ?Sized>(
    catalog: &LayoutCatalog,
    resolver: &R,
    config: &GenStepConfig,
    seed: u64,
    runs: usize,
) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| run_hash(catalog, resolver, config, seed))
        .collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        seed,
    }
}

/// Run `threads` generation events concurrently against one shared catalog.
///
/// Uses scoped threads so the catalog and resolver need no `'static` bound.
pub fn run_parallel_generations_scoped<R: SymbolResolver + Sync + ?Sized>(
    catalog: &LayoutCatalog,
    resolver: &R,
    config: &GenStepConfig,
    seed: u64,
    threads: usize,
) -> DeterminismResult {
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| run_hash(catalog, resolver, config, seed)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("generation thread panicked"))
            .collect::<Vec<_>>()
    });
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        seed,
    }
}

fn run_hash<R: SymbolResolver + ?Sized>(
    catalog: &LayoutCatalog,
    resolver: &R,
    config: &GenStepConfig,
    seed: u64,
) -> u64 {
    match generate_once(catalog, resolver, config, Cell::new(0, 0), seed) {
        Ok((_, map)) => hash_instructions(&map.log),
        Err(err) => {
            let mut hasher = DefaultHasher::new();
            err.to_string().hash(&mut hasher);
            hasher.finish()
        }
    }
}
