use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_data::{BracketTableLoader, StandardDeductionLoader};
use clap::Parser;

/// Validate a bracket table CSV and summarize the tables it produces.
///
/// The CSV file should have the following columns:
/// - jurisdiction: e.g. US
/// - tax_year: The tax year (e.g., 2026)
/// - kind: ordinary or long_term_capital_gains
/// - schedule: The IRS schedule code (X, Y-1, Y-2, Z)
/// - lower_bound: First dollar of the bracket
/// - upper_bound: End of the bracket (empty for unbounded)
/// - rate: The marginal tax rate as a decimal (e.g., 0.10)
#[derive(Parser, Debug)]
#[command(name = "calc-data-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket data
    #[arg(short, long)]
    file: PathBuf,

    /// Optional standard deductions CSV to validate alongside
    #[arg(short, long)]
    deductions: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking bracket tables in: {}", args.file.display());

    let file = File::open(&args.file).with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BracketTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let tables = BracketTableLoader::build(&records).context("Bracket tables failed validation")?;

    for table in &tables {
        let top_rate = table.brackets().last().map(|b| b.rate).unwrap_or_default();
        println!(
            "  {:<40} {:>2} brackets, top rate {}",
            table.key().to_string(),
            table.brackets().len(),
            top_rate
        );
    }

    if let Some(path) = &args.deductions {
        let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let deductions =
            StandardDeductionLoader::load(file).with_context(|| format!("Failed to load: {}", path.display()))?;
        println!("Loaded {} standard deductions", deductions.len());
    }

    println!("All {} tables are valid.", tables.len());

    Ok(())
}
