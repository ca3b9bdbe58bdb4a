//! Typed access to the raw fields of one calculation request.
//!
//! Every accessor normalizes through [`crate::normalize`] and tags failures
//! with the field name. A field that is absent or blank is treated the same
//! way: required accessors fail with [`CalculationError::MissingField`],
//! optional ones return `None` or the supplied default. Free text is the
//! exception: only an empty value counts as missing.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use super::{CalculationError, EngineDefaults};
use crate::models::{RawInputs, RawValue};
use crate::normalize::{NormalizeError, ValueKind, normalize, normalize_date};

/// Builds a calculator input from the request fields. Implementations must
/// read and validate every field before returning, so a formula never runs
/// on partially valid input.
pub trait FromFields: Sized {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError>;
}

pub struct Fields<'a> {
    inputs: &'a RawInputs,
    defaults: &'a EngineDefaults,
}

impl<'a> Fields<'a> {
    pub fn new(
        inputs: &'a RawInputs,
        defaults: &'a EngineDefaults,
    ) -> Self {
        Self { inputs, defaults }
    }

    pub fn defaults(&self) -> &'a EngineDefaults {
        self.defaults
    }

    /// The raw value of a field, `None` when absent or blank.
    pub fn raw(
        &self,
        name: &str,
    ) -> Option<&'a RawValue> {
        self.inputs.get(name).filter(|value| !value.is_blank())
    }

    /// Names of the non-blank fields, sorted. Used for logging; values are
    /// never logged.
    pub fn names(&self) -> Vec<&'a str> {
        let mut names: Vec<&str> = self
            .inputs
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn required(
        &self,
        field: &'static str,
        kind: ValueKind,
    ) -> Result<Decimal, CalculationError> {
        self.optional(field, kind)?
            .ok_or(CalculationError::MissingField(field))
    }

    pub fn optional(
        &self,
        field: &'static str,
        kind: ValueKind,
    ) -> Result<Option<Decimal>, CalculationError> {
        self.raw(field)
            .map(|raw| normalize(raw, kind).map_err(|source| invalid(field, source)))
            .transpose()
    }

    pub fn or_default(
        &self,
        field: &'static str,
        kind: ValueKind,
        default: Decimal,
    ) -> Result<Decimal, CalculationError> {
        Ok(self.optional(field, kind)?.unwrap_or(default))
    }

    pub fn optional_count(
        &self,
        field: &'static str,
    ) -> Result<Option<i64>, CalculationError> {
        self.optional(field, ValueKind::Count)?
            .map(|n| {
                n.to_i64()
                    .ok_or_else(|| out_of_range(field, ValueKind::Count, n, "does not fit a whole number"))
            })
            .transpose()
    }

    pub fn count_or(
        &self,
        field: &'static str,
        default: i64,
    ) -> Result<i64, CalculationError> {
        Ok(self.optional_count(field)?.unwrap_or(default))
    }

    pub fn optional_date(
        &self,
        field: &'static str,
    ) -> Result<Option<NaiveDate>, CalculationError> {
        self.raw(field)
            .map(|raw| normalize_date(raw).map_err(|source| invalid(field, source)))
            .transpose()
    }

    pub fn required_date(
        &self,
        field: &'static str,
    ) -> Result<NaiveDate, CalculationError> {
        self.optional_date(field)?
            .ok_or(CalculationError::MissingField(field))
    }

    /// Free text, untrimmed, so whitespace-only text is kept. Numbers are
    /// returned in their decimal form.
    pub fn required_text(
        &self,
        field: &'static str,
    ) -> Result<String, CalculationError> {
        self.inputs
            .get(field)
            .map(RawValue::as_text)
            .filter(|text| !text.is_empty())
            .ok_or(CalculationError::MissingField(field))
    }

    /// A value from a closed set, parsed with `parse`.
    pub fn choice<T>(
        &self,
        field: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, CalculationError> {
        let Some(raw) = self.raw(field) else {
            return Ok(None);
        };
        let text = raw.as_text();
        match parse(text.trim()) {
            Some(value) => Ok(Some(value)),
            None => {
                warn!(field, kind = %ValueKind::Choice, "rejected input");
                Err(invalid(field, NormalizeError::invalid_format(ValueKind::Choice, text)))
            }
        }
    }
}

pub fn invalid(
    field: &'static str,
    source: NormalizeError,
) -> CalculationError {
    CalculationError::InvalidField { field, source }
}

/// A value that normalized cleanly but breaks a calculator-specific limit.
pub fn out_of_range(
    field: &'static str,
    kind: ValueKind,
    value: impl fmt::Display,
    reason: impl Into<String>,
) -> CalculationError {
    let source = NormalizeError::out_of_range(kind, value, reason);
    warn!(field, error = %source, "rejected input");
    invalid(field, source)
}
