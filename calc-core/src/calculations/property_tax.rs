//! Property tax from an assessed value and a local tax rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::{max, round_half_up, round_rate};
use crate::engine::{CalculationError, Fields, FromFields};
use crate::models::{Figure, FormulaOutcome};
use crate::normalize::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTaxInput {
    pub assessed_value: Decimal,
    /// Fraction, e.g. `0.012` for 1.2%.
    pub tax_rate: Decimal,
    /// Share of the value that is assessed, `1` when the whole value is.
    pub assessment_ratio: Decimal,
    pub exemption: Decimal,
}

impl FromFields for PropertyTaxInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        Ok(Self {
            assessed_value: fields.required("assessed_value", ValueKind::Currency)?,
            tax_rate: fields.required("tax_rate", ValueKind::Percentage)?,
            assessment_ratio: fields.or_default("assessment_ratio", ValueKind::Percentage, Decimal::ONE)?,
            exemption: fields.or_default("exemption", ValueKind::Currency, Decimal::ZERO)?,
        })
    }
}

pub fn calculate(input: &PropertyTaxInput) -> FormulaOutcome {
    let taxable = max(input.assessed_value * input.assessment_ratio - input.exemption, Decimal::ZERO);
    let annual = round_half_up(taxable * input.tax_rate);

    let effective_rate = if input.assessed_value.is_zero() {
        Decimal::ZERO
    } else {
        round_rate(annual / input.assessed_value)
    };

    FormulaOutcome {
        headline: Figure::amount("annual_tax", annual),
        category: None,
        figures: vec![
            Figure::amount("monthly_tax", round_half_up(annual / dec!(12))),
            Figure::amount("taxable_value", round_half_up(taxable)),
            Figure::rate("effective_rate", effective_rate),
        ],
    }
}
