//! Data validation utilities.

use std::path::Path;

use structgen_core::prelude::*;

use crate::loader::{load_content, LoadResult};

/// Outcome of validating a data directory.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Layouts found.
    pub layouts: usize,
    /// Symbols defined, the empty token included.
    pub symbols: usize,
    /// Every problem found, one per failing layer.
    pub problems: Vec<StructureError>,
}

impl ValidationReport {
    /// Whether the data is usable as is.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty() && self.layouts > 0
    }
}

/// Validate all RON data files in a directory.
///
/// Loading failures are returned as errors. Content problems are collected
/// in the report so every broken layout is listed at once.
///
/// # Errors
///
/// Returns an error if the symbol file or any layout file fails to load.
pub fn validate_data_directory(path: &Path) -> LoadResult<ValidationReport> {
    let content = load_content(path)?;
    let mut problems = content.catalog.validate(&content.symbols);
    if content.catalog.is_empty() {
        problems.push(StructureError::EmptyCatalog);
    }

    for problem in &problems {
        tracing::warn!("{problem}");
    }

    Ok(ValidationReport {
        layouts: content.catalog.len(),
        symbols: content.symbols.len(),
        problems,
    })
}
