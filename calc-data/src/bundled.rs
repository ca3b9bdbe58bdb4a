use std::fs::File;
use std::io::Read;
use std::path::Path;

use calc_core::BracketCatalog;
use tracing::info;

use crate::loader::{BracketTableLoader, LoaderError, StandardDeductionLoader};

/// File names looked up by [`load_catalog_from_dir`].
pub const BRACKETS_FILE: &str = "tax_brackets.csv";
pub const DEDUCTIONS_FILE: &str = "standard_deductions.csv";

/// Tax year of the data compiled into the binary.
pub const BUNDLED_TAX_YEAR: i32 = 2026;

const BUNDLED_BRACKETS: &str = include_str!("../data/2026/tax_brackets.csv");
const BUNDLED_DEDUCTIONS: &str = include_str!("../data/2026/standard_deductions.csv");

/// Catalog built from the bundled US federal tables.
///
/// # Errors
///
/// Only fails if the bundled CSV files are malformed, which the tests in
/// this crate rule out.
pub fn bundled_catalog() -> Result<BracketCatalog, LoaderError> {
    let catalog = catalog_from_readers(BUNDLED_BRACKETS.as_bytes(), BUNDLED_DEDUCTIONS.as_bytes())?;
    info!(tables = catalog.len(), tax_year = BUNDLED_TAX_YEAR, "loaded bundled bracket tables");
    Ok(catalog)
}

/// Catalog built from `tax_brackets.csv` and `standard_deductions.csv` in
/// `dir`. The deductions file is optional.
pub fn load_catalog_from_dir(dir: &Path) -> Result<BracketCatalog, LoaderError> {
    let brackets_path = dir.join(BRACKETS_FILE);
    let brackets = open(&brackets_path)?;

    let deductions_path = dir.join(DEDUCTIONS_FILE);
    let catalog = if deductions_path.exists() {
        catalog_from_readers(brackets, open(&deductions_path)?)?
    } else {
        catalog_from_readers(brackets, std::io::empty())?
    };

    info!(tables = catalog.len(), dir = %dir.display(), "loaded bracket tables");
    Ok(catalog)
}

/// Builds a catalog from a brackets CSV and a deductions CSV. An empty
/// deductions reader loads no deductions.
pub fn catalog_from_readers<B: Read, D: Read>(
    brackets: B,
    deductions: D,
) -> Result<BracketCatalog, LoaderError> {
    let mut catalog = BracketCatalog::new();
    for table in BracketTableLoader::load(brackets)? {
        catalog.insert(table);
    }
    for deduction in StandardDeductionLoader::load(deductions)? {
        catalog.insert_standard_deduction(deduction);
    }
    Ok(catalog)
}

fn open(path: &Path) -> Result<File, LoaderError> {
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })
}
