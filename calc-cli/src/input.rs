use calc_core::{RawInputs, RawValue, ToolId};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("expected key=value, got '{0}'")]
    MissingEquals(String),

    #[error("empty field name in '{0}'")]
    EmptyKey(String),

    #[error("field '{0}' given more than once")]
    Duplicate(String),
}

/// Parses `key=value` command-line arguments into raw inputs.
///
/// Only the first `=` splits, so values may contain `=`. Values are kept as
/// text for the engine to normalize.
pub fn parse_assignments<I, S>(args: I) -> Result<RawInputs, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut inputs = RawInputs::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| InputError::MissingEquals(arg.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(InputError::EmptyKey(arg.to_string()));
        }
        if inputs.insert(key.to_string(), RawValue::from(value)).is_some() {
            return Err(InputError::Duplicate(key.to_string()));
        }
    }
    Ok(inputs)
}

/// Gives `holiday-countdown` a `from` date of `today` unless one was supplied.
pub fn default_countdown_start(
    tool: &str,
    inputs: &mut RawInputs,
    today: NaiveDate,
) {
    if ToolId::parse(tool) != Some(ToolId::HolidayCountdown) {
        return;
    }
    let given = inputs.get("from").is_some_and(|v| !v.is_blank());
    if !given {
        inputs.insert("from".to_string(), RawValue::from(today.format("%Y-%m-%d").to_string()));
    }
}
