use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TableKey;

/// Holding-period classification for capital gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingPeriod {
    /// Held 365 days or fewer.
    ShortTerm,
    /// Held more than 365 days.
    LongTerm,
}

impl HoldingPeriod {
    pub const LONG_TERM_AFTER_DAYS: i64 = 365;

    pub fn from_days(days: i64) -> Self {
        if days > Self::LONG_TERM_AFTER_DAYS {
            Self::LongTerm
        } else {
            Self::ShortTerm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShortTerm => "short-term",
            Self::LongTerm => "long-term",
        }
    }
}

/// The part of a taxable amount that fell inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    pub amount_taxed: Decimal,
    /// Tax from this bracket, rounded to cents for display.
    pub tax: Decimal,
}

/// Result of a bracket-based calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    pub gross_amount: Decimal,
    pub taxable_amount: Decimal,
    pub tax_owed: Decimal,
    pub net_amount: Decimal,
    pub effective_rate: Decimal,
    pub marginal_rate: Decimal,
    pub breakdown: Vec<BracketSlice>,
    pub table: TableKey,
    pub holding_period: Option<HoldingPeriod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FigureValue {
    Amount(Decimal),
    Rate(Decimal),
    Quantity { value: Decimal, unit: String },
    Count(i64),
    Date(NaiveDate),
    Text(String),
}

/// A named output value of a single-formula calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Figure {
    pub name: String,
    pub value: FigureValue,
}

impl Figure {
    pub fn new(
        name: impl Into<String>,
        value: FigureValue,
    ) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn amount(
        name: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(name, FigureValue::Amount(value))
    }

    pub fn rate(
        name: impl Into<String>,
        value: Decimal,
    ) -> Self {
        Self::new(name, FigureValue::Rate(value))
    }

    pub fn quantity(
        name: impl Into<String>,
        value: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FigureValue::Quantity {
                value,
                unit: unit.into(),
            },
        )
    }

    pub fn count(
        name: impl Into<String>,
        value: i64,
    ) -> Self {
        Self::new(name, FigureValue::Count(value))
    }

    pub fn date(
        name: impl Into<String>,
        value: NaiveDate,
    ) -> Self {
        Self::new(name, FigureValue::Date(value))
    }
}

/// Result of a single-formula calculator (BMI, paint cost, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaOutcome {
    pub headline: Figure,
    pub category: Option<String>,
    pub figures: Vec<Figure>,
}

impl FormulaOutcome {
    /// Looks up a figure by name, including the headline.
    pub fn figure(
        &self,
        name: &str,
    ) -> Option<&FigureValue> {
        std::iter::once(&self.headline)
            .chain(self.figures.iter())
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationResult {
    Tax(TaxComputation),
    Formula(FormulaOutcome),
}

impl CalculationResult {
    pub fn as_tax(&self) -> Option<&TaxComputation> {
        match self {
            Self::Tax(t) => Some(t),
            Self::Formula(_) => None,
        }
    }

    pub fn as_formula(&self) -> Option<&FormulaOutcome> {
        match self {
            Self::Formula(f) => Some(f),
            Self::Tax(_) => None,
        }
    }
}
