//! Batch calculations from a CSV file.
//!
//! ## CSV Format
//!
//! One request per row. The `tool` column names the calculator; every other
//! column is an input field passed to it by header name. Column order does
//! not matter. Empty cells are left out of the request, so a file can mix
//! tools that read different fields.
//!
//! | Column          | Required | Notes                                       |
//! |-----------------|----------|---------------------------------------------|
//! | `tool`          | yes      | A tool id such as `capital-gains` or `bmi`  |
//! | any other name  | no       | Raw field value, e.g. `"$50,000"` or `70kg` |
//!
//! ### Example
//!
//! ```csv
//! tool,cost_basis,sale_price,holding_period_days,weight,height
//! capital-gains,"$50,000",150000,400,,
//! bmi,,,,70 kg,1.75 m
//! ```
//!
//! A row whose calculation fails does not stop the batch; its error is
//! reported in place of a result. A row that panics is reported the same way.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use calc_core::{CalculationEngine, CalculationError, CalculationResult, RawInputs, RawValue};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::input::default_countdown_start;

const TOOL_COLUMN: &str = "tool";

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The file is not well-formed CSV (ragged rows, bad quoting, ...).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("CSV has no '{TOOL_COLUMN}' column")]
    MissingToolColumn,

    /// `row` is 1-based, the header is row 0.
    #[error("row {row} has an empty '{TOOL_COLUMN}' cell")]
    MissingTool { row: usize },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single calculation request read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub row: usize,
    pub tool: String,
    pub inputs: RawInputs,
}

/// Why a single row produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("calculation aborted: {0}")]
    Panicked(String),
}

impl RowError {
    /// The input field at fault, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Calculation(error) => error.field(),
            Self::Panicked(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub row: usize,
    pub tool: String,
    pub result: Result<CalculationResult, RowError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Parses CSV text into requests, in file order.
///
/// # Errors
///
/// * [`BatchError::Parse`] when the CSV is structurally invalid.
/// * [`BatchError::MissingToolColumn`] when the header lacks `tool`.
/// * [`BatchError::MissingTool`] when a row leaves `tool` empty.
pub fn load_from_str(input: &str) -> Result<Vec<BatchRequest>, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    let tool_index = headers
        .iter()
        .position(|h| h == TOOL_COLUMN)
        .ok_or(BatchError::MissingToolColumn)?;

    reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            let record = record?;
            let row = idx + 1;
            let tool = record.get(tool_index).unwrap_or_default();
            if tool.is_empty() {
                return Err(BatchError::MissingTool { row });
            }

            let inputs = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(i, (_, value))| *i != tool_index && !value.is_empty())
                .map(|(_, (name, value))| (name.to_string(), RawValue::from(value)))
                .collect();

            Ok(BatchRequest {
                row,
                tool: tool.to_string(),
                inputs,
            })
        })
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<BatchRequest>, BatchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

/// Runs every request through `engine`. `today` fills the countdown start
/// date for rows that leave it out.
pub fn run(
    engine: &CalculationEngine,
    requests: Vec<BatchRequest>,
    today: NaiveDate,
) -> Vec<BatchOutcome> {
    requests
        .into_iter()
        .map(|mut request| {
            default_countdown_start(&request.tool, &mut request.inputs, today);
            let result = isolated(|| engine.calculate(&request.tool, &request.inputs));
            match &result {
                Ok(_) => debug!(row = request.row, tool = %request.tool, "row calculated"),
                Err(error) => warn!(row = request.row, tool = %request.tool, %error, "row failed"),
            }
            BatchOutcome {
                row: request.row,
                tool: request.tool,
                result,
            }
        })
        .collect()
}

/// Runs one row's calculation, turning a panic into a [`RowError`].
fn isolated<F>(calculate: F) -> Result<CalculationResult, RowError>
where
    F: FnOnce() -> Result<CalculationResult, CalculationError>,
{
    match panic::catch_unwind(AssertUnwindSafe(calculate)) {
        Ok(result) => result.map_err(RowError::from),
        Err(payload) => Err(RowError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
