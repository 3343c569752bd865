//! Structgen - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use structgen_core::prelude::{Anchor, Cell, GenStepConfig};
use structgen_tools::loader::load_content;
use structgen_tools::preview::{plan_preview, render, PreviewConfig};
use structgen_tools::validate::validate_data_directory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "structgen-tools")]
#[command(about = "Development tools for custom structure layouts")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate symbols and layouts
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Plan one structure and print it
    Preview {
        /// Path to data directory
        #[arg(long, default_value = "assets/data")]
        data: PathBuf,
        /// Layout to preview instead of a seeded pick
        #[arg(long)]
        layout: Option<String>,
        /// Seed for layout selection
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Anchor cell as `x,y`
        #[arg(long, value_parser = parse_cell)]
        anchor: Option<Cell>,
        /// Generation config (RON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Dump instructions as JSON instead of ASCII
        #[arg(long)]
        json: bool,
    },
}

fn parse_cell(s: &str) -> Result<Cell, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Cell::new(x, y))
}

fn load_config(path: Option<&Path>) -> Result<GenStepConfig, String> {
    let Some(path) = path else {
        return Ok(GenStepConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
    GenStepConfig::from_ron(&source).map_err(|e| format!("Invalid config '{}': {e}", path.display()))
}

fn run_validate(path: &Path) -> Result<(), String> {
    tracing::info!("Validating data files in: {}", path.display());
    let report = validate_data_directory(path).map_err(|e| e.to_string())?;
    tracing::info!(
        "Checked {} layouts against {} symbols",
        report.layouts,
        report.symbols
    );
    if report.is_valid() {
        Ok(())
    } else {
        Err(format!("{} problem(s) found", report.problems.len()))
    }
}

fn run_preview(
    data: &Path,
    layout: Option<&str>,
    seed: u64,
    anchor: Option<Cell>,
    config: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let mut config = load_config(config)?;
    if let Some(cell) = anchor {
        config = config.with_anchor(Anchor::Fixed(cell));
    }
    let content = load_content(data).map_err(|e| e.to_string())?;
    let preview = plan_preview(&content, layout, seed, &config).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&preview).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("{}", preview.layout);
        print!(
            "{}",
            render(&preview.region, &preview.instructions, &PreviewConfig::default())
        );
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let result = match &cli.command {
        Commands::Validate { path } => run_validate(path),
        Commands::Preview {
            data,
            layout,
            seed,
            anchor,
            config,
            json,
        } => run_preview(
            data,
            layout.as_deref(),
            *seed,
            *anchor,
            config.as_deref(),
            *json,
        ),
    };

    match result {
        Ok(()) => tracing::info!("Done"),
        Err(e) => {
            tracing::error!("Failed: {e}");
            std::process::exit(1);
        }
    }
}
