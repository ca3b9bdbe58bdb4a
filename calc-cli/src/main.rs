use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;

use calc_cli::config::{AppConfig, OutputFormat, Overrides, Settings};
use calc_cli::{batch, build_engine, input, logging, render, tables_listing, tools_listing};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tax and everyday-formula calculators.
///
/// Bracket tables are loaded once at start-up, from `--data-dir` when given
/// and from the bundled US federal tables otherwise.
#[derive(Debug, Parser)]
#[command(name = "calc", version)]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding `tax_brackets.csv` and `standard_deductions.csv`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Tax year used when a request does not name one.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Jurisdiction used when a request does not name one.
    #[arg(long, global = true)]
    jurisdiction: Option<String>,

    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// More log output on stderr (-v info, -vv debug). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one calculation, e.g. `calc calculate bmi weight=70kg height=1.75m`.
    Calculate {
        tool: String,
        /// Input fields as key=value.
        fields: Vec<String>,
    },
    /// Run every row of a CSV file with a `tool` column.
    Batch { file: PathBuf },
    /// List the tool ids.
    Tools,
    /// List the loaded bracket tables and standard deductions.
    Tables,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let settings = Settings::resolve(
        Overrides {
            tax_year: cli.year,
            jurisdiction: cli.jurisdiction,
            data_dir: cli.data_dir,
            format: cli.format,
        },
        config,
    );
    debug!(?settings, "resolved settings");

    if let Command::Tools = cli.command {
        print!("{}", tools_listing());
        return Ok(ExitCode::SUCCESS);
    }

    let engine = build_engine(&settings).context("loading bracket tables")?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Calculate { tool, fields } => {
            let mut inputs = input::parse_assignments(&fields)?;
            input::default_countdown_start(&tool, &mut inputs, today);
            let result = engine.calculate(&tool, &inputs)?;
            match settings.format {
                OutputFormat::Text => print!("{}", render::Rendered(&result)),
                OutputFormat::Json => println!("{}", render::to_json(&result)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { file } => {
            let requests =
                batch::load_from_file(&file).with_context(|| format!("reading batch file {}", file.display()))?;
            let outcomes = batch::run(&engine, requests, today);
            match settings.format {
                OutputFormat::Text => print!("{}", render::batch_to_text(&outcomes)),
                OutputFormat::Json => println!("{}", render::batch_to_json(&outcomes)?),
            }
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed > 0 {
                eprintln!("{failed} of {} rows failed", outcomes.len());
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Tables => {
            print!("{}", tables_listing(engine.catalog()));
            Ok(ExitCode::SUCCESS)
        }
        Command::Tools => Ok(ExitCode::SUCCESS),
    }
}
