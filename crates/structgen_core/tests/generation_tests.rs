//! End-to-end tests for custom structure generation.
//!
//! Drives `StructureGenStep` against a recording map using the shared
//! fixtures, then checks placement, layering and failure behavior.

use proptest::prelude::*;
use structgen_core::prelude::*;
use structgen_test_utils::determinism::{generate_once, relative_to};
use structgen_test_utils::fixtures::{
    cabin_layout, outpost_layout, rows, sample_symbols, seeded_rng, RecordingMap,
};
use structgen_test_utils::strategies;

fn single(def: LayoutDefinition) -> LayoutCatalog {
    let mut catalog = LayoutCatalog::new();
    catalog.register(def).expect("fresh catalog");
    catalog
}

fn count_non_empty(def: &LayoutDefinition) -> usize {
    def.layers()
        .flat_map(|(_, rows)| rows.iter())
        .flat_map(|row| row.chars())
        .filter(|c| *c != '.')
        .count()
}

// ==========================================================================
// Scenario Tests
// ==========================================================================

#[test]
fn test_outpost_placed_around_map_center() {
    let catalog = single(outpost_layout());
    let symbols = sample_symbols();

    let (report, map) = generate_once(
        &catalog,
        &symbols,
        &GenStepConfig::default(),
        Cell::new(50, 50),
        7,
    )
    .expect("outpost generates");

    assert_eq!(report.layout, "Outpost");
    assert_eq!(report.region.origin, Cell::new(49, 49));
    assert_eq!(report.terrain_placed, 4);
    assert_eq!(report.things_spawned, 2);
    assert_eq!(report.variants_processed, 1);

    for cell in [
        Cell::new(49, 49),
        Cell::new(50, 49),
        Cell::new(49, 50),
        Cell::new(50, 50),
    ] {
        assert_eq!(map.terrain.get(&cell).map(String::as_str), Some("Sand"));
    }
    assert_eq!(map.things_at(Cell::new(49, 49)), vec!["Wall"]);
    assert_eq!(map.things_at(Cell::new(49, 50)), vec!["Wall"]);
    assert!(map.things_at(Cell::new(50, 49)).is_empty());
    assert!(map.things_at(Cell::new(50, 50)).is_empty());
}

#[test]
fn test_terrain_applied_before_any_spawn() {
    let catalog = single(cabin_layout());
    let symbols = sample_symbols();

    let (_, map) = generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(0, 0), 3)
        .expect("cabin generates");

    let first_spawn = map
        .log
        .iter()
        .position(|i| !i.is_terrain())
        .expect("cabin spawns things");
    assert_eq!(first_spawn, 20, "all 20 floor cells come first");
    assert!(map.log[first_spawn..].iter().all(|i| !i.is_terrain()));
}

#[test]
fn test_cabin_layers_stack_on_one_region() {
    let catalog = single(cabin_layout());
    let symbols = sample_symbols();

    let (report, map) =
        generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(10, 10), 0)
            .expect("cabin generates");

    // 5x4 centered on (10, 10) starts at (8, 8).
    let origin = report.region.origin;
    assert_eq!(origin, Cell::new(8, 8));
    assert_eq!(report.variants_processed, 2);

    // Walls: 5 + 2 + 2 + 4, door replaces the middle of the bottom row.
    let walls = map.things.iter().filter(|t| t.prototype == "Wall").count();
    assert_eq!(walls, 13);
    assert_eq!(map.things_at(origin + (2, 3)), vec!["Door"]);

    // Second layer: bed anchored at its first column, then armchair after it.
    let bed = map
        .things
        .iter()
        .find(|t| t.prototype == "DoubleBed")
        .expect("bed placed");
    assert_eq!(bed.cell, origin + (1, 1));
    assert_eq!(bed.rotation, Rotation::South);
    assert_eq!(map.things_at(origin + (3, 1)), vec!["Armchair"]);

    let silver = map.things.iter().find(|t| t.prototype == "Silver").expect("loot");
    assert_eq!(silver.category, ThingCategory::Item);
    let muffalo = map.things.iter().find(|t| t.prototype == "Muffalo").expect("pawn");
    assert_eq!(muffalo.category, ThingCategory::Pawn);
    assert_eq!(muffalo.cell, origin + (3, 2));

    let wall = map.things.iter().find(|t| t.prototype == "Wall").expect("wall");
    assert_eq!(wall.stuff.as_deref(), Some("Steel"));
}

#[test]
fn test_rotation_suffix_overrides_symbol_default() {
    let def = LayoutDefinition::new("Gate", vec![rows(&["#, Door:E, #"])]);
    let catalog = single(def);
    let symbols = sample_symbols();

    let (_, map) = generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(5, 5), 1)
        .expect("gate generates");

    let door = map.things.iter().find(|t| t.prototype == "Door").expect("door");
    assert_eq!(door.rotation, Rotation::East);
    assert_eq!(door.cell, Cell::new(5, 5));
}

#[test]
fn test_unknown_symbol_aborts_by_default() {
    let def = LayoutDefinition::new("Broken", vec![rows(&["#?"])]).with_terrain(rows(&["SS"]));
    let catalog = single(def);
    let symbols = sample_symbols();

    let err = generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(0, 0), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        StructureError::UnknownSymbol { ref token, column: 1, row: 0, .. } if token == "?"
    ));
}

#[test]
fn test_unknown_symbol_skipped_when_configured() {
    let def =
        LayoutDefinition::new("Broken", vec![rows(&["#?#"])]).with_terrain(rows(&["SSS"]));
    let catalog = single(def);
    let symbols = sample_symbols();
    let config = GenStepConfig::default().with_unknown_symbols(UnknownSymbolPolicy::Skip);

    let (report, map) = generate_once(&catalog, &symbols, &config, Cell::new(1, 0), 1)
        .expect("unknown symbols skipped");

    assert_eq!(report.things_spawned, 2);
    assert_eq!(report.terrain_placed, 3);
    assert_eq!(map.things_at(Cell::new(0, 0)), vec!["Wall"]);
    assert_eq!(map.things_at(Cell::new(2, 0)), vec!["Wall"]);
}

#[test]
fn test_zero_variants_is_malformed_and_touches_nothing() {
    let def = LayoutDefinition::new("Hollow", Vec::new()).with_terrain(rows(&["SS"]));
    let catalog = single(def);
    let symbols = sample_symbols();
    let mut map = RecordingMap::centered_on(Cell::new(0, 0));

    let err = StructureGenStep::new(&catalog, &symbols)
        .generate(&mut map, &mut seeded_rng(1))
        .unwrap_err();

    assert!(matches!(err, StructureError::MalformedLayout { .. }));
    assert!(map.is_untouched());
}

#[test]
fn test_oversized_content_layer_rejected() {
    let def = LayoutDefinition::new("Tall", vec![rows(&["##", "##", "##"])])
        .with_terrain(rows(&["SS", "SS"]));
    let catalog = single(def);
    let symbols = sample_symbols();

    let err = generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(0, 0), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        StructureError::RegionMismatch {
            layer: LayerId::Content(0),
            grid_height: 3,
            region_height: 2,
            ..
        }
    ));
}

#[test]
fn test_staged_mode_leaves_map_untouched_on_late_error() {
    let def = LayoutDefinition::new("LateFailure", vec![rows(&["##"]), rows(&["###"])])
        .with_terrain(rows(&["SS"]));
    let catalog = single(def);
    let symbols = sample_symbols();
    let config = GenStepConfig::default().with_apply_mode(ApplyMode::Staged);
    let mut map = RecordingMap::centered_on(Cell::new(0, 0));

    let result = StructureGenStep::new(&catalog, &symbols)
        .with_config(config)
        .generate(&mut map, &mut seeded_rng(2));

    assert!(matches!(result, Err(StructureError::RegionMismatch { .. })));
    assert!(map.is_untouched());
}

#[test]
fn test_ragged_later_layer_rejected_before_placing() {
    let def = LayoutDefinition::new("Lopsided", vec![rows(&["###", "#.#"]), rows(&["@@@", "@"])])
        .with_terrain(rows(&["SSS", "SSS"]));
    let catalog = single(def);
    let symbols = sample_symbols();
    let mut map = RecordingMap::centered_on(Cell::new(0, 0));

    let err = StructureGenStep::new(&catalog, &symbols)
        .generate(&mut map, &mut seeded_rng(4))
        .unwrap_err();

    assert!(matches!(err, StructureError::MalformedLayout { ref layout, .. } if layout == "Lopsided"));
    assert!(err.to_string().contains("layout #2 row 1"));
    assert!(map.is_untouched());
}

#[test]
fn test_skip_measures_unknown_without_terrain_grid() {
    let def = LayoutDefinition::new("Bare", vec![rows(&["#?#"])]);
    let catalog = single(def);
    let symbols = sample_symbols();
    let config = GenStepConfig::default().with_unknown_symbols(UnknownSymbolPolicy::Skip);

    let (report, map) = generate_once(&catalog, &symbols, &config, Cell::new(1, 0), 1)
        .expect("unknown symbol measured as one column");

    assert_eq!(report.region, Region::new(Cell::new(0, 0), 3, 1));
    assert_eq!(report.things_spawned, 2);
    assert_eq!(map.things_at(Cell::new(0, 0)), vec!["Wall"]);
    assert_eq!(map.things_at(Cell::new(2, 0)), vec!["Wall"]);
}

#[test]
fn test_plan_does_not_need_a_map() {
    let catalog = single(cabin_layout());
    let symbols = sample_symbols();
    let step = StructureGenStep::new(&catalog, &symbols);

    let event = step
        .plan(Cell::new(0, 0), &mut seeded_rng(9))
        .expect("cabin plans");
    assert_eq!(event.dimensions, Dimensions::new(4, 5));

    let instructions: Vec<_> = event
        .instructions(&symbols, UnknownSymbolPolicy::Abort)
        .collect::<Result<_>>()
        .expect("cabin is valid");
    assert_eq!(instructions.len(), 20 + 14 + 4);
}

#[test]
fn test_catalog_validate_reports_every_bad_layout() {
    let mut catalog = LayoutCatalog::new();
    catalog.register(cabin_layout()).unwrap();
    catalog
        .register(LayoutDefinition::new("Unknown", vec![rows(&["#X"])]))
        .unwrap();
    catalog
        .register(LayoutDefinition::new("Swapped", vec![rows(&["S#"])]))
        .unwrap();

    let errors = catalog.validate(&sample_symbols());

    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .any(|e| matches!(e, StructureError::UnknownSymbol { layout, .. } if layout == "Unknown")));
    assert!(errors
        .iter()
        .any(|e| matches!(e, StructureError::LayerMismatch { layout, .. } if layout == "Swapped")));
}

// ==========================================================================
// Property Tests
// ==========================================================================

proptest! {
    /// Dimensions come from the terrain grid.
    #[test]
    fn prop_dimensions_match_terrain_grid(def in strategies::layout(12, 12, 3)) {
        let symbols = sample_symbols();
        let dims = resolve_dimensions(&def, &symbols).unwrap();
        let terrain = def.terrain_grid.as_ref().unwrap();

        prop_assert_eq!(dims.height as usize, terrain.len());
        prop_assert_eq!(dims.width as usize, terrain[0].chars().count());
    }

    /// Without a terrain grid the first content layer sets the footprint.
    #[test]
    fn prop_bare_layout_measured_from_first_layer(
        grid in strategies::grid(strategies::CONTENT_ALPHABET, 10, 10),
        anchor in strategies::anchor(),
    ) {
        let symbols = sample_symbols();
        let def = LayoutDefinition::new("Bare", vec![grid.clone()]);
        let expected = count_non_empty(&def);
        let catalog = single(def);

        let (report, map) =
            generate_once(&catalog, &symbols, &GenStepConfig::default(), anchor, 0).unwrap();

        prop_assert_eq!(report.region.height as usize, grid.len());
        prop_assert_eq!(report.region.width as usize, grid[0].chars().count());
        prop_assert_eq!(report.terrain_placed, 0);
        prop_assert_eq!(map.log.len(), expected);
    }

    /// One instruction per non-empty token, and no layer exceeds its area.
    #[test]
    fn prop_one_instruction_per_non_empty_token(
        def in strategies::layout(10, 10, 3),
        seed in any::<u64>(),
    ) {
        let symbols = sample_symbols();
        let expected = count_non_empty(&def);
        let layers = def.layouts.len() + 1;
        let catalog = single(def);

        let (report, map) =
            generate_once(&catalog, &symbols, &GenStepConfig::default(), Cell::new(0, 0), seed)
                .unwrap();
        let area = report.region.area() as usize;

        prop_assert_eq!(map.log.len(), expected);
        prop_assert!(report.terrain_placed <= area);
        prop_assert!(map.log.len() <= area * layers);
        prop_assert!(map.log.iter().all(|i| report.region.contains(i.cell())));
    }

    /// Moving the anchor moves the structure without changing its shape.
    #[test]
    fn prop_anchor_only_translates(
        def in strategies::layout(8, 8, 2),
        a in strategies::anchor(),
        b in strategies::anchor(),
        seed in any::<u64>(),
    ) {
        prop_assume!(a != b);
        let symbols = sample_symbols();
        let catalog = single(def);
        let config = GenStepConfig::default();

        let (report_a, map_a) = generate_once(&catalog, &symbols, &config, a, seed).unwrap();
        let (report_b, map_b) = generate_once(&catalog, &symbols, &config, b, seed).unwrap();

        prop_assert_ne!(report_a.region.origin, report_b.region.origin);
        prop_assert_eq!(
            relative_to(&map_a.log, report_a.region.origin),
            relative_to(&map_b.log, report_b.region.origin)
        );
    }

    /// Staged and eager application agree whenever generation succeeds.
    #[test]
    fn prop_staged_matches_eager(def in strategies::layout(8, 8, 3), seed in any::<u64>()) {
        let symbols = sample_symbols();
        let catalog = single(def);
        let eager = GenStepConfig::default();
        let staged = GenStepConfig::default().with_apply_mode(ApplyMode::Staged);

        let (report_e, map_e) = generate_once(&catalog, &symbols, &eager, Cell::new(3, 3), seed).unwrap();
        let (report_s, map_s) = generate_once(&catalog, &symbols, &staged, Cell::new(3, 3), seed).unwrap();

        prop_assert_eq!(report_e, report_s);
        prop_assert_eq!(map_e.log, map_s.log);
    }
}
