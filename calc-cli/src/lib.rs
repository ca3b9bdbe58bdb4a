pub mod batch;
pub mod config;
pub mod input;
pub mod logging;
pub mod render;

use calc_core::{BracketCatalog, CalculationEngine, ToolId};
use calc_data::LoaderError;
use tracing::info;

use config::Settings;

/// Loads the bracket catalog named by `settings` (a data directory, or the
/// bundled tables) and wraps it in an engine.
pub fn build_engine(settings: &Settings) -> Result<CalculationEngine, LoaderError> {
    let catalog = match &settings.data_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading bracket tables from directory");
            calc_data::load_catalog_from_dir(dir)?
        }
        None => calc_data::bundled_catalog()?,
    };
    Ok(CalculationEngine::new(catalog, settings.defaults.clone()))
}

/// One line per tool: id and description. Tools that read a bracket table
/// are marked `[brackets]`.
pub fn tools_listing() -> String {
    let width = ToolId::all().iter().map(|t| t.as_str().len()).max().unwrap_or(0);
    ToolId::all()
        .iter()
        .map(|tool| {
            let marker = if tool.uses_brackets() { " [brackets]" } else { "" };
            format!("{:<width$}  {}{marker}\n", tool.as_str(), tool.description())
        })
        .collect()
}

/// One line per loaded table, plus the standard deductions.
pub fn tables_listing(catalog: &BracketCatalog) -> String {
    let mut out = String::new();
    for table in catalog.tables() {
        out.push_str(&format!("{}  ({} brackets)\n", table.key(), table.brackets().len()));
    }
    for deduction in catalog.deductions() {
        out.push_str(&format!(
            "{} {} {} standard deduction  {:.2}\n",
            deduction.jurisdiction, deduction.tax_year, deduction.filing_status, deduction.amount
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use calc_core::EngineDefaults;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::OutputFormat;

    fn settings(data_dir: Option<PathBuf>) -> Settings {
        Settings {
            defaults: EngineDefaults::default(),
            data_dir,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn bundled_tables_when_no_directory() {
        let engine = build_engine(&settings(None)).unwrap();

        assert_eq!(engine.catalog().len(), 10);
    }

    #[test]
    fn data_directory_is_loaded() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../calc-data/data/2026");
        let engine = build_engine(&settings(Some(dir))).unwrap();

        assert_eq!(engine.catalog().len(), 10);
    }

    #[test]
    fn missing_directory_fails() {
        let err = build_engine(&settings(Some(PathBuf::from("no/such/dir")))).unwrap_err();

        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn tools_listing_has_every_tool() {
        let listing = tools_listing();

        assert_eq!(listing.lines().count(), ToolId::all().len());
        assert!(listing.lines().any(|l| l.starts_with("capital-gains ")));
        let marked: Vec<&str> = listing
            .lines()
            .filter(|l| l.ends_with(" [brackets]"))
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(marked, vec!["capital-gains", "income-tax"]);
    }

    #[test]
    fn tables_listing_names_each_table() {
        let engine = build_engine(&settings(None)).unwrap();
        let listing = tables_listing(engine.catalog());

        assert!(listing.contains("US 2026 S ordinary  (7 brackets)"));
        assert!(listing.contains("US 2026 HOH standard deduction  21900.00"));
    }
}
