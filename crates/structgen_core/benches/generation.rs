//! Generation benchmarks for structgen_core.
//!
//! Run with: `cargo bench -p structgen_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use structgen_core::prelude::*;

fn square_rows(size: usize, fill: char) -> Vec<String> {
    (0..size).map(|_| fill.to_string().repeat(size)).collect()
}

fn walled_rows(size: usize) -> Vec<String> {
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    if row == 0 || col == 0 || row == size - 1 || col == size - 1 {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect()
}

fn symbols() -> SymbolTable {
    let mut table = SymbolTable::new();
    table
        .register("#", PlacementRule::thing("Wall"))
        .expect("fresh table");
    table
        .register("S", PlacementRule::terrain("Sand"))
        .expect("fresh table");
    table
}

/// Runs generation benchmarks for the structgen_core crate.
pub fn generation_benchmark(c: &mut Criterion) {
    let size = 64;
    let mut catalog = LayoutCatalog::new();
    catalog
        .register(
            LayoutDefinition::new("Fortress", vec![walled_rows(size), walled_rows(size)])
                .with_terrain(square_rows(size, 'S')),
        )
        .expect("fresh catalog");
    let table = symbols();
    let step = StructureGenStep::new(&catalog, &table);

    c.bench_function("resolve_dimensions_64", |b| {
        let def = catalog.get("Fortress").expect("registered");
        b.iter(|| resolve_dimensions(black_box(def), &table))
    });

    c.bench_function("instruction_stream_64", |b| {
        b.iter(|| {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let event = step
                .plan(Cell::new(100, 100), &mut rng)
                .expect("valid layout");
            event
                .instructions(&table, UnknownSymbolPolicy::Abort)
                .filter(|i| i.is_ok())
                .count()
        })
    });
}

criterion_group!(benches, generation_benchmark);
criterion_main!(benches);
