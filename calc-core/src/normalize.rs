//! Conversion of user-facing input into canonical numeric values.
//!
//! Form fields arrive as free text (`"$1,250"`, `"7.5%"`, `"5'10\""`,
//! `"150 lb"`) or as plain numbers. [`normalize`] strips the decorations a
//! calculator page allows, converts units, and range-checks the result.
//!
//! | Kind         | Canonical unit | Bare numbers mean        | Ceiling        |
//! |--------------|----------------|--------------------------|----------------|
//! | `Currency`   | dollars        | dollars                  | 1,000,000,000,000 |
//! | `Percentage` | fraction 0–1   | percent (`7.5` = 7.5%)   | 100%           |
//! | `Mass`       | kilograms      | kilograms                | 10,000 kg      |
//! | `Length`     | metres         | metres                   | 100,000 m      |
//! | `Area`       | square feet    | square feet              | 10,000,000 sq ft |
//! | `Count`      | whole number   | whole number             | 1,000,000,000  |
//!
//! Negative values are rejected for every kind.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::warn;

use crate::models::RawValue;

/// Date layouts accepted by [`normalize_date`], tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

static MEASURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>[+-]?[\d,_]*\.?\d+)\s*(?P<unit>[^\d\s.,+-].*)?$")
        .expect("measure pattern is valid")
});

static FEET_INCHES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^(?P<feet>\d+(?:\.\d+)?)\s*(?:'|′|ft|feet|foot)\s*(?P<inches>\d+(?:\.\d+)?)\s*(?:"|″|in|inch|inches)?$"#,
    )
    .expect("feet/inches pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Currency,
    Percentage,
    Mass,
    Length,
    Area,
    Count,
    Date,
    Choice,
}

impl ValueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Currency => "currency amount",
            Self::Percentage => "percentage",
            Self::Mass => "mass",
            Self::Length => "length",
            Self::Area => "area",
            Self::Count => "count",
            Self::Date => "date",
            Self::Choice => "choice",
        }
    }

    /// Unit that unit-less input of this kind is read in.
    pub fn canonical_unit(&self) -> Option<Unit> {
        match self {
            Self::Mass => Some(Unit::Kilogram),
            Self::Length => Some(Unit::Meter),
            Self::Area => Some(Unit::SquareFoot),
            _ => None,
        }
    }

    /// Largest accepted canonical value.
    fn ceiling(&self) -> Option<Decimal> {
        match self {
            Self::Currency => Some(dec!(1000000000000)),
            Self::Percentage => Some(Decimal::ONE),
            Self::Mass => Some(dec!(10000)),
            Self::Length => Some(dec!(100000)),
            Self::Area => Some(dec!(10000000)),
            Self::Count => Some(dec!(1000000000)),
            Self::Date | Self::Choice => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Units accepted as suffixes for mass, length and area input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Kilogram,
    Gram,
    Pound,
    Ounce,
    Stone,
    Meter,
    Centimeter,
    Millimeter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
    SquareFoot,
    SquareMeter,
    SquareYard,
}

impl Unit {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Kilogram | Self::Gram | Self::Pound | Self::Ounce | Self::Stone => ValueKind::Mass,
            Self::Meter
            | Self::Centimeter
            | Self::Millimeter
            | Self::Kilometer
            | Self::Inch
            | Self::Foot
            | Self::Yard
            | Self::Mile => ValueKind::Length,
            Self::SquareFoot | Self::SquareMeter | Self::SquareYard => ValueKind::Area,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Pound => "lb",
            Self::Ounce => "oz",
            Self::Stone => "st",
            Self::Meter => "m",
            Self::Centimeter => "cm",
            Self::Millimeter => "mm",
            Self::Kilometer => "km",
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::Yard => "yd",
            Self::Mile => "mi",
            Self::SquareFoot => "sqft",
            Self::SquareMeter => "sqm",
            Self::SquareYard => "sqyd",
        }
    }

    /// Canonical units per one of this unit.
    fn factor(&self) -> Decimal {
        match self {
            Self::Kilogram | Self::Meter | Self::SquareFoot => Decimal::ONE,
            Self::Gram | Self::Millimeter => dec!(0.001),
            Self::Pound => dec!(0.45359237),
            Self::Ounce => dec!(0.028349523125),
            Self::Stone => dec!(6.35029318),
            Self::Centimeter => dec!(0.01),
            Self::Kilometer => dec!(1000),
            Self::Inch => dec!(0.0254),
            Self::Foot => dec!(0.3048),
            Self::Yard => dec!(0.9144),
            Self::Mile => dec!(1609.344),
            // 1 / 0.09290304
            Self::SquareMeter => dec!(10.763910416709722308333505556),
            Self::SquareYard => dec!(9),
        }
    }

    /// Parses a unit symbol or name. Case, spaces and dots are ignored, so
    /// `"Sq. Ft."`, `"sqft"` and `"ft²"` are the same unit.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect();
        let unit = match key.as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Self::Kilogram,
            "g" | "gram" | "grams" => Self::Gram,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            "oz" | "ounce" | "ounces" => Self::Ounce,
            "st" | "stone" | "stones" => Self::Stone,
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meter,
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Self::Centimeter,
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Self::Millimeter,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometer,
            "in" | "inch" | "inches" | "\"" | "″" => Self::Inch,
            "ft" | "foot" | "feet" | "'" | "′" => Self::Foot,
            "yd" | "yard" | "yards" => Self::Yard,
            "mi" | "mile" | "miles" => Self::Mile,
            "sqft" | "ft2" | "ft²" | "squarefoot" | "squarefeet" => Self::SquareFoot,
            "sqm" | "m2" | "m²" | "squaremeter" | "squaremeters" | "squaremetre" | "squaremetres" => {
                Self::SquareMeter
            }
            "sqyd" | "yd2" | "yd²" | "squareyard" | "squareyards" => Self::SquareYard,
            _ => return None,
        };
        Some(unit)
    }

    /// `value` in this unit expressed in the canonical unit of its kind,
    /// `None` when the product does not fit a `Decimal`.
    pub fn to_canonical(
        &self,
        value: Decimal,
    ) -> Option<Decimal> {
        value.checked_mul(self.factor())
    }

    pub fn from_canonical(
        &self,
        value: Decimal,
    ) -> Decimal {
        value / self.factor()
    }
}

impl fmt::Display for Unit {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Errors produced while normalizing user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Nothing parseable remained after stripping allowed decorations, or a
    /// unit of the wrong kind was supplied.
    #[error("'{input}' is not a valid {kind}")]
    InvalidFormat { kind: ValueKind, input: String },

    /// The value parsed but violates a domain constraint.
    #[error("{kind} {value} is out of range: {reason}")]
    OutOfRange {
        kind: ValueKind,
        value: String,
        reason: String,
    },
}

impl NormalizeError {
    pub fn invalid_format(
        kind: ValueKind,
        input: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            kind,
            input: input.into(),
        }
    }

    pub fn out_of_range(
        kind: ValueKind,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::OutOfRange {
            kind,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Normalizes a raw value of a numeric kind into its canonical unit.
///
/// `Date` and `Choice` are not numeric; use [`normalize_date`] for dates.
///
/// # Errors
///
/// * [`NormalizeError::InvalidFormat`] when the input cannot be parsed.
/// * [`NormalizeError::OutOfRange`] when the value is negative, above the
///   ceiling for its kind, or too large to represent at all.
pub fn normalize(
    raw: &RawValue,
    kind: ValueKind,
) -> Result<Decimal, NormalizeError> {
    let result = match raw {
        RawValue::Number(n) => from_number(*n, kind),
        RawValue::Text(s) => from_text(s, kind),
    }
    .and_then(|value| check_range(value, kind));

    if let Err(ref error) = result {
        warn!(%kind, %error, "rejected input");
    }
    result
}

/// Parses a calendar date written as `YYYY-MM-DD` or `MM/DD/YYYY`.
pub fn normalize_date(raw: &RawValue) -> Result<NaiveDate, NormalizeError> {
    let text = raw.as_text();
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            warn!(kind = %ValueKind::Date, input = %text, "rejected input");
            NormalizeError::invalid_format(ValueKind::Date, text)
        })
}

fn from_number(
    n: Decimal,
    kind: ValueKind,
) -> Result<Decimal, NormalizeError> {
    match kind {
        ValueKind::Percentage => Ok(n / dec!(100)),
        ValueKind::Count => whole(n, &n.to_string()),
        ValueKind::Date | ValueKind::Choice => Err(NormalizeError::invalid_format(kind, n.to_string())),
        _ => Ok(n),
    }
}

fn from_text(
    input: &str,
    kind: ValueKind,
) -> Result<Decimal, NormalizeError> {
    let trimmed = input.trim();
    let parsed = match kind {
        ValueKind::Currency => parse_number(&strip_currency(trimmed)),
        ValueKind::Percentage => {
            let body = trimmed.strip_suffix('%').unwrap_or(trimmed);
            parse_number(body).map(|percent| percent / dec!(100))
        }
        ValueKind::Count => {
            let n = parse_number(trimmed).map_err(|issue| issue.into_error(kind, input))?;
            return whole(n, input);
        }
        ValueKind::Mass | ValueKind::Length | ValueKind::Area => parse_measure(trimmed, kind),
        ValueKind::Date | ValueKind::Choice => Err(NumberIssue::Malformed),
    };
    parsed.map_err(|issue| issue.into_error(kind, input))
}

/// Why text failed to become a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberIssue {
    Malformed,
    /// Well-formed, but beyond what a `Decimal` holds.
    TooLarge,
}

impl NumberIssue {
    fn into_error(
        self,
        kind: ValueKind,
        input: &str,
    ) -> NormalizeError {
        match self {
            Self::Malformed => NormalizeError::invalid_format(kind, input),
            Self::TooLarge => {
                let reason = kind
                    .ceiling()
                    .map_or_else(|| "is too large".to_string(), |ceiling| above_ceiling(kind, ceiling));
                NormalizeError::out_of_range(kind, input.trim(), reason)
            }
        }
    }
}

fn whole(
    n: Decimal,
    input: &str,
) -> Result<Decimal, NormalizeError> {
    if n.fract().is_zero() {
        Ok(n)
    } else {
        Err(NormalizeError::invalid_format(ValueKind::Count, input))
    }
}

/// Removes currency symbols and a leading or trailing `USD` code.
fn strip_currency(s: &str) -> String {
    let without_symbols = s.replace(['$', '€', '£', '¥'], "");
    let trimmed = without_symbols.trim();
    let upper = trimmed.to_ascii_uppercase();
    let body = if upper.starts_with("USD") {
        &trimmed[3..]
    } else if upper.ends_with("USD") {
        &trimmed[..trimmed.len() - 3]
    } else {
        trimmed
    };
    body.trim().to_string()
}

/// Parses a plain number, ignoring thousands separators.
fn parse_number(s: &str) -> Result<Decimal, NumberIssue> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    if cleaned.is_empty() {
        return Err(NumberIssue::Malformed);
    }
    Decimal::from_str(&cleaned).map_err(|_| {
        if is_plain_number(&cleaned) {
            NumberIssue::TooLarge
        } else {
            NumberIssue::Malformed
        }
    })
}

/// Optional sign, digits, at most one decimal point.
fn is_plain_number(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let mut parts = unsigned.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

fn parse_measure(
    s: &str,
    kind: ValueKind,
) -> Result<Decimal, NumberIssue> {
    if kind == ValueKind::Length {
        if let Some(caps) = FEET_INCHES.captures(s) {
            let feet = Unit::Foot.to_canonical(parse_number(&caps["feet"])?);
            let inches = Unit::Inch.to_canonical(parse_number(&caps["inches"])?);
            return feet
                .zip(inches)
                .and_then(|(feet, inches)| feet.checked_add(inches))
                .ok_or(NumberIssue::TooLarge);
        }
    }

    let caps = MEASURE.captures(s).ok_or(NumberIssue::Malformed)?;
    let number = parse_number(&caps["number"])?;
    let unit_text = caps.name("unit").map(|m| m.as_str().trim()).unwrap_or("");
    let unit = if unit_text.is_empty() {
        kind.canonical_unit()
    } else {
        Unit::parse(unit_text).filter(|unit| unit.kind() == kind)
    }
    .ok_or(NumberIssue::Malformed)?;
    unit.to_canonical(number).ok_or(NumberIssue::TooLarge)
}

fn check_range(
    value: Decimal,
    kind: ValueKind,
) -> Result<Decimal, NormalizeError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(NormalizeError::out_of_range(
            kind,
            display_value(value, kind),
            "must not be negative",
        ));
    }
    if let Some(ceiling) = kind.ceiling() {
        if value > ceiling {
            return Err(NormalizeError::out_of_range(
                kind,
                display_value(value, kind),
                above_ceiling(kind, ceiling),
            ));
        }
    }
    Ok(value)
}

fn above_ceiling(
    kind: ValueKind,
    ceiling: Decimal,
) -> String {
    match kind {
        ValueKind::Percentage => "must be between 0% and 100%".to_string(),
        _ => format!("exceeds the maximum of {}", display_value(ceiling, kind)),
    }
}

fn display_value(
    value: Decimal,
    kind: ValueKind,
) -> String {
    match (kind, kind.canonical_unit()) {
        (ValueKind::Percentage, _) => format!("{}%", (value * dec!(100)).normalize()),
        (_, Some(unit)) => format!("{} {}", value.normalize(), unit),
        _ => value.normalize().to_string(),
    }
}
