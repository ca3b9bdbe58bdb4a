//! How much monthly rent an income supports.
//!
//! Two limits apply: the rent-to-income ratio (30% of gross monthly income
//! unless given) and a 36% cap on total monthly debt including rent. The
//! affordable rent is the lower of the two.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::{max, round_half_up, round_rate};
use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{Figure, FormulaOutcome};
use crate::normalize::ValueKind;

pub const DEFAULT_RENT_RATIO: Decimal = dec!(0.30);
pub const DEBT_TO_INCOME_CAP: Decimal = dec!(0.36);
/// Smallest rent-to-income ratio accepted.
const MIN_RENT_RATIO: Decimal = dec!(0.01);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentInput {
    pub annual_income: Decimal,
    pub monthly_debts: Decimal,
    /// Fraction of gross monthly income.
    pub rent_ratio: Decimal,
    pub desired_rent: Option<Decimal>,
}

impl FromFields for RentInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let annual_income = fields.required("annual_income", ValueKind::Currency)?;
        let monthly_debts = fields.or_default("monthly_debts", ValueKind::Currency, Decimal::ZERO)?;
        let rent_ratio = fields.or_default("rent_ratio", ValueKind::Percentage, DEFAULT_RENT_RATIO)?;
        let desired_rent = fields.optional("desired_rent", ValueKind::Currency)?;

        if rent_ratio < MIN_RENT_RATIO {
            return Err(out_of_range(
                "rent_ratio",
                ValueKind::Percentage,
                format!("{}%", (rent_ratio * dec!(100)).normalize()),
                "must be at least 1%",
            ));
        }

        Ok(Self {
            annual_income,
            monthly_debts,
            rent_ratio,
            desired_rent,
        })
    }
}

pub fn calculate(input: &RentInput) -> FormulaOutcome {
    let monthly_income = input.annual_income / dec!(12);
    let recommended = monthly_income * input.rent_ratio;
    let debt_cap = max(monthly_income * DEBT_TO_INCOME_CAP - input.monthly_debts, Decimal::ZERO);
    let affordable = recommended.min(debt_cap);

    let mut figures = vec![
        Figure::amount("monthly_income", round_half_up(monthly_income)),
        Figure::amount("recommended_rent", round_half_up(recommended)),
        Figure::amount("debt_limited_rent", round_half_up(debt_cap)),
        Figure::amount("annual_rent", round_half_up(affordable * dec!(12))),
    ];

    // Left out when the quotient is undefined or beyond a Decimal.
    let category = input.desired_rent.map(|desired| {
        if let Some(share) = desired.checked_div(monthly_income) {
            figures.push(Figure::rate("desired_rent_to_income", round_rate(share)));
        }
        if let Some(needed) = (desired * dec!(12)).checked_div(input.rent_ratio) {
            figures.push(Figure::amount("income_needed", round_half_up(needed)));
        }
        classify(desired, affordable, debt_cap).to_string()
    });

    FormulaOutcome {
        headline: Figure::amount("affordable_rent", round_half_up(affordable)),
        category,
        figures,
    }
}

fn classify(
    desired: Decimal,
    affordable: Decimal,
    debt_cap: Decimal,
) -> &'static str {
    if desired <= affordable {
        "Affordable"
    } else if desired <= debt_cap {
        "Stretch"
    } else {
        "Unaffordable"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::engine::EngineDefaults;
    use crate::models::FigureValue;
    use crate::normalize::NormalizeError;
    use crate::test_support::inputs;

    fn input(
        income: Decimal,
        debts: Decimal,
        desired: Option<Decimal>,
    ) -> RentInput {
        RentInput {
            annual_income: income,
            monthly_debts: debts,
            rent_ratio: DEFAULT_RENT_RATIO,
            desired_rent: desired,
        }
    }

    #[test]
    fn ratio_limits_rent_without_debts() {
        let outcome = calculate(&input(dec!(60000), dec!(0), None));

        assert_eq!(outcome.headline, Figure::amount("affordable_rent", dec!(1500.00)));
        assert_eq!(outcome.figure("debt_limited_rent"), Some(&FigureValue::Amount(dec!(1800.00))));
        assert_eq!(outcome.category, None);
    }

    #[test]
    fn debts_lower_the_limit() {
        let outcome = calculate(&input(dec!(60000), dec!(500), None));

        assert_eq!(outcome.headline, Figure::amount("affordable_rent", dec!(1300.00)));
    }

    #[test]
    fn debts_above_cap_leave_nothing() {
        let outcome = calculate(&input(dec!(60000), dec!(2500), None));

        assert_eq!(outcome.headline, Figure::amount("affordable_rent", dec!(0)));
    }

    #[test]
    fn desired_rent_categories() {
        let category = |desired| calculate(&input(dec!(60000), dec!(0), Some(desired))).category;

        assert_eq!(category(dec!(1500)).as_deref(), Some("Affordable"));
        assert_eq!(category(dec!(1700)).as_deref(), Some("Stretch"));
        assert_eq!(category(dec!(1900)).as_deref(), Some("Unaffordable"));
    }

    #[test]
    fn income_needed_for_desired_rent() {
        let outcome = calculate(&input(dec!(60000), dec!(0), Some(dec!(2000))));

        assert_eq!(outcome.figure("income_needed"), Some(&FigureValue::Amount(dec!(80000.00))));
        assert_eq!(outcome.figure("desired_rent_to_income"), Some(&FigureValue::Rate(dec!(0.4))));
    }

    #[test]
    fn tiny_rent_ratio_is_rejected() {
        let raw = inputs(&[
            ("annual_income", "60000"),
            ("rent_ratio", "0.00000000000000000000001"),
            ("desired_rent", "1000000"),
        ]);
        let defaults = EngineDefaults::default();
        let err = RentInput::from_fields(&Fields::new(&raw, &defaults)).unwrap_err();

        assert_eq!(err.field(), Some("rent_ratio"));
        assert!(matches!(err.normalize_error(), Some(NormalizeError::OutOfRange { .. })));
    }

    #[test]
    fn desired_rent_share_skipped_when_it_cannot_be_represented() {
        let outcome = calculate(&input(dec!(0.0000000000000000000000000012), dec!(0), Some(dec!(1000000))));

        assert_eq!(outcome.figure("desired_rent_to_income"), None);
        assert_eq!(outcome.category.as_deref(), Some("Unaffordable"));
        assert_eq!(outcome.figure("income_needed"), Some(&FigureValue::Amount(dec!(40000000.00))));
    }

    #[test]
    fn zero_income_has_no_desired_rent_share() {
        let outcome = calculate(&input(dec!(0), dec!(0), Some(dec!(500))));

        assert_eq!(outcome.figure("desired_rent_to_income"), None);
        assert_eq!(outcome.headline, Figure::amount("affordable_rent", dec!(0)));
    }
}
