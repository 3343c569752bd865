//! The map-generation step that places one custom structure.
//!
//! One call to [`StructureGenStep::generate`] is one generation event:
//! pick a layout, measure it, center its region on the anchor, paint the
//! terrain grid once, then build every content layer in declaration
//! order on the same region. Nothing is retried; the first error aborts
//! the event and is returned to the host.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::LayoutCatalog;
use crate::dimension::{measure_layout, Dimensions};
use crate::error::{Result, StructureError};
use crate::instruction::{PlacementInstruction, StructureMap};
use crate::layout::LayoutDefinition;
use crate::region::{Cell, Region};
use crate::room::{RoomBuilder, UnknownSymbolPolicy};
use crate::symbol::SymbolResolver;
use crate::terrain::TerrainPainter;

/// Ordering key the host scheduler uses to interleave this step with others.
pub const SEED_PART: u64 = 916_516_155;

/// Where the structure's region is centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// The map's own center.
    #[default]
    MapCenter,
    /// A fixed cell.
    Fixed(Cell),
}

/// When instructions reach the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplyMode {
    /// Apply each instruction as soon as it is produced. A failure leaves
    /// everything before it on the map.
    #[default]
    Eager,
    /// Produce every instruction first and touch the map only if all
    /// layers succeeded.
    Staged,
}

/// Generation step configuration.
///
/// # Example RON
///
/// ```ron
/// GenStepConfig(
///     enable_log: true,
///     unknown_symbols: Skip,
///     anchor: Fixed(Cell(x: 40, y: 40)),
///     apply_mode: Staged,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenStepConfig {
    /// Report each finished layer at info level.
    pub enable_log: bool,
    /// Handling of content tokens missing from the symbol table.
    pub unknown_symbols: UnknownSymbolPolicy,
    /// Region anchor.
    pub anchor: Anchor,
    /// Eager or staged application.
    pub apply_mode: ApplyMode,
}

impl Default for GenStepConfig {
    fn default() -> Self {
        Self {
            enable_log: false,
            unknown_symbols: UnknownSymbolPolicy::Abort,
            anchor: Anchor::MapCenter,
            apply_mode: ApplyMode::Eager,
        }
    }
}

impl GenStepConfig {
    /// Parse a configuration from RON.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ParseError`] if the text is not a valid config.
    pub fn from_ron(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| StructureError::ParseError(e.to_string()))
    }

    /// Enable or disable per-layer pass messages.
    #[must_use]
    pub const fn with_logging(mut self, enable_log: bool) -> Self {
        self.enable_log = enable_log;
        self
    }

    /// Set the unknown-symbol policy.
    #[must_use]
    pub const fn with_unknown_symbols(mut self, policy: UnknownSymbolPolicy) -> Self {
        self.unknown_symbols = policy;
        self
    }

    /// Set the anchor.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the apply mode.
    #[must_use]
    pub const fn with_apply_mode(mut self, apply_mode: ApplyMode) -> Self {
        self.apply_mode = apply_mode;
        self
    }
}

/// State of one generation event.
#[derive(Debug, Clone)]
pub struct GenerationEvent<'a> {
    /// Selected layout.
    pub layout: &'a LayoutDefinition,
    /// Its resolved size.
    pub dimensions: Dimensions,
    /// Footprint on the map.
    pub region: Region,
    /// Content layers built so far.
    pub variants_processed: usize,
}

impl<'a> GenerationEvent<'a> {
    /// Measure every grid of `layout` and center it on `anchor`.
    ///
    /// `policy` decides whether unknown content tokens fail the
    /// measurement or count as one empty column.
    ///
    /// # Errors
    ///
    /// Fails if any grid is empty, ragged or unresolvable.
    pub fn new<R: SymbolResolver + ?Sized>(
        layout: &'a LayoutDefinition,
        resolver: &R,
        anchor: Cell,
        policy: UnknownSymbolPolicy,
    ) -> Result<Self> {
        let dimensions = measure_layout(layout, resolver, policy)?;
        let region = Region::centered_on(anchor, dimensions.width, dimensions.height);
        Ok(Self {
            layout,
            dimensions,
            region,
            variants_processed: 0,
        })
    }

    /// Every instruction of the event, terrain first, as one lazy stream.
    ///
    /// The stream ends after the first error.
    pub fn instructions<R: SymbolResolver + ?Sized + 'a>(
        &self,
        resolver: &'a R,
        policy: UnknownSymbolPolicy,
    ) -> impl Iterator<Item = Result<PlacementInstruction>> + 'a {
        let layout = self.layout;
        let region = self.region;

        let terrain = layout.terrain_grid.iter().flat_map(move |rows| {
            layer_stream(TerrainPainter::new(resolver, region).paint(&layout.name, rows))
        });
        let content = layout
            .layouts
            .iter()
            .enumerate()
            .flat_map(move |(index, rows)| {
                layer_stream(
                    RoomBuilder::new(resolver, region)
                        .with_policy(policy)
                        .build(&layout.name, index, rows),
                )
            });

        terrain.chain(content).scan(false, |failed, item| {
            if *failed {
                return None;
            }
            *failed = item.is_err();
            Some(item)
        })
    }
}

type InstructionStream<'a> = Box<dyn Iterator<Item = Result<PlacementInstruction>> + 'a>;

fn layer_stream<'a, I>(layer: Result<I>) -> InstructionStream<'a>
where
    I: Iterator<Item = Result<PlacementInstruction>> + 'a,
{
    match layer {
        Ok(instructions) => Box::new(instructions),
        Err(err) => Box::new(std::iter::once(Err(err))),
    }
}

/// Summary of a finished generation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Name of the layout that was placed.
    pub layout: String,
    /// Footprint on the map.
    pub region: Region,
    /// Terrain instructions applied.
    pub terrain_placed: usize,
    /// Spawn instructions applied.
    pub things_spawned: usize,
    /// Content layers built.
    pub variants_processed: usize,
}

impl GenerationReport {
    fn new(event: &GenerationEvent<'_>) -> Self {
        Self {
            layout: event.layout.name.clone(),
            region: event.region,
            terrain_placed: 0,
            things_spawned: 0,
            variants_processed: 0,
        }
    }

    fn record(&mut self, instruction: &PlacementInstruction) {
        if instruction.is_terrain() {
            self.terrain_placed += 1;
        } else {
            self.things_spawned += 1;
        }
    }
}

/// Places a randomly chosen layout from a catalog onto a map.
pub struct StructureGenStep<'a, R: ?Sized> {
    catalog: &'a LayoutCatalog,
    resolver: &'a R,
    config: GenStepConfig,
}

impl<'a, R: SymbolResolver + ?Sized> StructureGenStep<'a, R> {
    /// Create a step with the default configuration.
    pub fn new(catalog: &'a LayoutCatalog, resolver: &'a R) -> Self {
        Self {
            catalog,
            resolver,
            config: GenStepConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GenStepConfig) -> Self {
        self.config = config;
        self
    }

    /// Ordering key for the host scheduler.
    #[must_use]
    pub const fn seed_part(&self) -> u64 {
        SEED_PART
    }

    /// Pick the layout for this event.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::EmptyCatalog`] if nothing is registered.
    pub fn select<G: Rng + ?Sized>(&self, rng: &mut G) -> Result<&'a LayoutDefinition> {
        self.catalog.choose(rng)
    }

    /// Select a layout and compute its region without touching a map.
    ///
    /// # Errors
    ///
    /// Fails if the catalog is empty or the layout cannot be measured.
    pub fn plan<G: Rng + ?Sized>(&self, anchor: Cell, rng: &mut G) -> Result<GenerationEvent<'a>> {
        let layout = self.select(rng)?;
        GenerationEvent::new(layout, self.resolver, anchor, self.config.unknown_symbols)
    }

    /// Run one generation event against `map`.
    ///
    /// # Errors
    ///
    /// Returns the first error met. In [`ApplyMode::Eager`] the map keeps
    /// whatever was applied before it.
    pub fn generate<M, G>(&self, map: &mut M, rng: &mut G) -> Result<GenerationReport>
    where
        M: StructureMap + ?Sized,
        G: Rng + ?Sized,
    {
        let anchor = match self.config.anchor {
            Anchor::MapCenter => map.center(),
            Anchor::Fixed(cell) => cell,
        };
        let mut event = self.plan(anchor, rng)?;
        tracing::debug!(
            layout = %event.layout.name,
            origin_x = event.region.origin.x,
            origin_y = event.region.origin.y,
            width = event.region.width,
            height = event.region.height,
            "Placing custom structure"
        );

        let report = match self.config.apply_mode {
            ApplyMode::Eager => self.apply_eager(&mut event, map)?,
            ApplyMode::Staged => self.apply_staged(&mut event, map)?,
        };

        tracing::debug!(
            layout = %report.layout,
            terrain = report.terrain_placed,
            things = report.things_spawned,
            variants = report.variants_processed,
            "Custom structure placed"
        );
        Ok(report)
    }

    fn apply_eager<M: StructureMap + ?Sized>(
        &self,
        event: &mut GenerationEvent<'a>,
        map: &mut M,
    ) -> Result<GenerationReport> {
        let layout = event.layout;
        let mut report = GenerationReport::new(event);

        if let Some(rows) = &layout.terrain_grid {
            let painter = TerrainPainter::new(self.resolver, event.region);
            for instruction in painter.paint(&layout.name, rows)? {
                let instruction = instruction?;
                map.apply(&instruction);
                report.record(&instruction);
            }
            if self.config.enable_log {
                tracing::info!(layout = %layout.name, "Terrain generation - PASS");
            }
        }

        let builder = RoomBuilder::new(self.resolver, event.region)
            .with_policy(self.config.unknown_symbols);
        for (index, rows) in layout.layouts.iter().enumerate() {
            for instruction in builder.build(&layout.name, index, rows)? {
                let instruction = instruction?;
                map.apply(&instruction);
                report.record(&instruction);
            }
            event.variants_processed += 1;
            if self.config.enable_log {
                tracing::info!(
                    layout = %layout.name,
                    "Layout {} generation - PASS",
                    event.variants_processed
                );
            }
        }

        report.variants_processed = event.variants_processed;
        Ok(report)
    }

    fn apply_staged<M: StructureMap + ?Sized>(
        &self,
        event: &mut GenerationEvent<'a>,
        map: &mut M,
    ) -> Result<GenerationReport> {
        let staged: Vec<PlacementInstruction> = event
            .instructions(self.resolver, self.config.unknown_symbols)
            .collect::<Result<_>>()?;

        let layout = event.layout;
        let mut report = GenerationReport::new(event);
        for instruction in &staged {
            map.apply(instruction);
            report.record(instruction);
        }

        if self.config.enable_log && layout.has_terrain() {
            tracing::info!(layout = %layout.name, "Terrain generation - PASS");
        }
        for _ in &layout.layouts {
            event.variants_processed += 1;
            if self.config.enable_log {
                tracing::info!(
                    layout = %layout.name,
                    "Layout {} generation - PASS",
                    event.variants_processed
                );
            }
        }

        report.variants_processed = event.variants_processed;
        Ok(report)
    }
}
