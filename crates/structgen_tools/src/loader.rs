//! Content loading from RON files.
//!
//! A data directory holds one symbol file and any number of layout files:
//!
//! ```text
//! data/
//! ├── symbols.ron        # [SymbolDef(..), ..]
//! └── layouts/
//!     ├── outpost.ron    # LayoutDefinition(..)
//!     └── cabin.ron
//! ```

use std::path::{Path, PathBuf};

use structgen_core::prelude::*;
use thiserror::Error;

/// Name of the symbol file inside a data directory.
pub const SYMBOLS_FILE: &str = "symbols.ron";

/// Name of the layout subdirectory inside a data directory.
pub const LAYOUTS_DIR: &str = "layouts";

/// Errors that can occur while loading content.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file or directory.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a RON file.
    #[error("Failed to parse RON file '{path}': {source}")]
    Parse {
        /// Path to the file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },

    /// Content parsed but was rejected by the registry.
    #[error("Invalid content in '{path}': {source}")]
    Structure {
        /// Path to the offending file.
        path: String,
        /// Registry error.
        #[source]
        source: StructureError,
    },
}

/// Result type for loading operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Everything loaded from one data directory.
#[derive(Debug, Clone)]
pub struct ContentSet {
    /// Symbol table built from `symbols.ron`.
    pub symbols: SymbolTable,
    /// Every layout under `layouts/`.
    pub catalog: LayoutCatalog,
}

fn read(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Load a symbol table from a RON list of symbol definitions.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if two
/// definitions share a token.
pub fn load_symbols(path: &Path) -> LoadResult<SymbolTable> {
    let contents = read(path)?;
    let defs: Vec<SymbolDef> = ron::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    let table = SymbolTable::from_defs(defs).map_err(|source| LoadError::Structure {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!("Loaded {} symbols from {}", table.len(), path.display());
    Ok(table)
}

/// Load a single layout definition.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_layout(path: &Path) -> LoadResult<LayoutDefinition> {
    let contents = read(path)?;
    ron::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load every `.ron` layout in `dir` into a catalog.
///
/// Files are registered in file-name order so that a seeded selection
/// picks the same layout on every platform. A missing directory yields an
/// empty catalog.
///
/// # Errors
///
/// Returns an error if any file fails to load or two layouts share a name.
pub fn load_catalog_from_directory(dir: &Path) -> LoadResult<LayoutCatalog> {
    let mut catalog = LayoutCatalog::new();

    if !dir.exists() {
        tracing::warn!("Layout directory does not exist: {}", dir.display());
        return Ok(catalog);
    }

    for path in ron_files(dir)? {
        let def = load_layout(&path)?;
        catalog.register(def).map_err(|source| LoadError::Structure {
            path: path.display().to_string(),
            source,
        })?;
    }

    tracing::info!("Loaded {} layouts from {}", catalog.len(), dir.display());
    Ok(catalog)
}

/// Load `symbols.ron` and `layouts/` from a data directory.
///
/// # Errors
///
/// Returns an error if either part fails to load.
pub fn load_content(data_dir: &Path) -> LoadResult<ContentSet> {
    let symbols = load_symbols(&data_dir.join(SYMBOLS_FILE))?;
    let catalog = load_catalog_from_directory(&data_dir.join(LAYOUTS_DIR))?;
    Ok(ContentSet { symbols, catalog })
}

fn ron_files(dir: &Path) -> LoadResult<Vec<PathBuf>> {
    let io_err = |source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|ext| ext == "ron") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
