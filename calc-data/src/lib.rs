//! Bracket tables and standard deductions from CSV, plus the bundled data
//! compiled into the binary.

mod bundled;
mod loader;

pub use bundled::{
    BRACKETS_FILE, BUNDLED_TAX_YEAR, DEDUCTIONS_FILE, bundled_catalog, catalog_from_readers, load_catalog_from_dir,
};
pub use loader::{
    BracketRecord, BracketTableLoader, LoaderError, StandardDeductionLoader, StandardDeductionRecord,
    schedule_to_filing_statuses,
};
