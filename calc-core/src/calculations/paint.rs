//! Paint needed to cover a wall area, and what it costs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::{ceil_whole, round_half_up};
use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{Figure, FormulaOutcome};
use crate::normalize::ValueKind;

/// Square feet one gallon covers in a single coat, unless the can says
/// otherwise.
pub const DEFAULT_COVERAGE_SQFT: Decimal = dec!(350);
pub const DEFAULT_COATS: i64 = 2;
/// Smallest coverage per gallon accepted, in square feet.
const MIN_COVERAGE_SQFT: Decimal = dec!(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintInput {
    /// Square feet.
    pub wall_area: Decimal,
    pub coats: i64,
    /// Square feet per gallon.
    pub coverage_per_gallon: Decimal,
    pub price_per_gallon: Decimal,
}

impl FromFields for PaintInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let wall_area = fields.required("wall_area", ValueKind::Area)?;
        let coats = fields.count_or("coats", DEFAULT_COATS)?;
        let coverage_per_gallon = fields.or_default("coverage_per_gallon", ValueKind::Area, DEFAULT_COVERAGE_SQFT)?;
        let price_per_gallon = fields.or_default("price_per_gallon", ValueKind::Currency, Decimal::ZERO)?;

        if coats < 1 {
            return Err(out_of_range("coats", ValueKind::Count, coats, "at least one coat is needed"));
        }
        if coverage_per_gallon < MIN_COVERAGE_SQFT {
            return Err(out_of_range(
                "coverage_per_gallon",
                ValueKind::Area,
                format!("{} sqft", coverage_per_gallon.normalize()),
                format!("must be at least {MIN_COVERAGE_SQFT} sqft"),
            ));
        }

        Ok(Self {
            wall_area,
            coats,
            coverage_per_gallon,
            price_per_gallon,
        })
    }
}

/// Gallons are reported to two places; cans are whole gallons rounded up.
pub fn calculate(input: &PaintInput) -> FormulaOutcome {
    let painted_area = input.wall_area * Decimal::from(input.coats);
    let gallons = painted_area / input.coverage_per_gallon;
    let cans = ceil_whole(gallons);

    FormulaOutcome {
        headline: Figure::quantity("gallons_needed", round_half_up(gallons), "gal"),
        category: None,
        figures: vec![
            Figure::quantity("cans_to_buy", cans, "cans"),
            Figure::quantity("painted_area", round_half_up(painted_area), "sqft"),
            Figure::amount("total_cost", round_half_up(cans * input.price_per_gallon)),
        ],
    }
}
