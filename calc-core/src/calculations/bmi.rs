//! Body mass index: weight in kilograms over the square of height in metres.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::category::ThresholdBands;
use super::common::{round_half_up, round_to};
use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{Figure, FormulaOutcome};
use crate::normalize::ValueKind;

const HEALTHY_MIN: Decimal = dec!(18.5);
const HEALTHY_MAX: Decimal = dec!(24.9);
/// Shortest height accepted, in metres.
const MIN_HEIGHT_M: Decimal = dec!(0.3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmiInput {
    pub weight_kg: Decimal,
    pub height_m: Decimal,
}

impl FromFields for BmiInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let weight_kg = fields.required("weight", ValueKind::Mass)?;
        let height_m = fields.required("height", ValueKind::Length)?;

        if weight_kg.is_zero() {
            return Err(out_of_range("weight", ValueKind::Mass, weight_kg, "must be greater than zero"));
        }
        if height_m < MIN_HEIGHT_M {
            return Err(out_of_range(
                "height",
                ValueKind::Length,
                format!("{} m", height_m.normalize()),
                format!("must be at least {MIN_HEIGHT_M} m"),
            ));
        }
        Ok(Self { weight_kg, height_m })
    }
}

fn categories() -> ThresholdBands {
    ThresholdBands::new("Obese")
        .below(dec!(18.5), "Underweight")
        .below(dec!(25), "Normal weight")
        .below(dec!(30), "Overweight")
}

/// BMI rounded to two places, classified on the rounded value.
pub fn calculate(input: &BmiInput) -> FormulaOutcome {
    let height_squared = input.height_m * input.height_m;
    let bmi = round_half_up(input.weight_kg / height_squared);

    FormulaOutcome {
        headline: Figure::quantity("bmi", bmi, "kg/m²"),
        category: Some(categories().classify(bmi).to_string()),
        figures: vec![
            Figure::quantity("weight", round_half_up(input.weight_kg), "kg"),
            Figure::quantity("height", round_half_up(input.height_m), "m"),
            Figure::quantity("healthy_weight_min", round_to(HEALTHY_MIN * height_squared, 1), "kg"),
            Figure::quantity("healthy_weight_max", round_to(HEALTHY_MAX * height_squared, 1), "kg"),
        ],
    }
}
