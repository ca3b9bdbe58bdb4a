//! Ovulation date and fertile window from the first day of the last period.
//!
//! Ovulation is placed one luteal phase before the next expected period.
//! The fertile window runs from five days before ovulation to one day after.

use chrono::{NaiveDate, TimeDelta};

use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{Figure, FormulaOutcome};
use crate::normalize::ValueKind;

pub const DEFAULT_CYCLE_DAYS: i64 = 28;
pub const DEFAULT_LUTEAL_DAYS: i64 = 14;
/// Naegele's rule: 280 days from the last menstrual period.
pub const PREGNANCY_DAYS: i64 = 280;

const CYCLE_RANGE: (i64, i64) = (21, 45);
const LUTEAL_RANGE: (i64, i64) = (9, 16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvulationInput {
    pub last_period: NaiveDate,
    pub cycle_length: i64,
    pub luteal_phase: i64,
}

impl FromFields for OvulationInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let last_period = fields.required_date("last_period_date")?;
        let cycle_length = within("cycle_length", fields.count_or("cycle_length", DEFAULT_CYCLE_DAYS)?, CYCLE_RANGE)?;
        let luteal_phase = within("luteal_phase", fields.count_or("luteal_phase", DEFAULT_LUTEAL_DAYS)?, LUTEAL_RANGE)?;

        Ok(Self {
            last_period,
            cycle_length,
            luteal_phase,
        })
    }
}

fn within(
    field: &'static str,
    days: i64,
    (low, high): (i64, i64),
) -> Result<i64, CalculationError> {
    if (low..=high).contains(&days) {
        Ok(days)
    } else {
        Err(out_of_range(field, ValueKind::Count, days, format!("must be between {low} and {high} days")))
    }
}

/// # Errors
///
/// [`CalculationError::InvalidField`] on `last_period_date` when a derived
/// date falls outside the supported calendar.
pub fn calculate(input: &OvulationInput) -> Result<FormulaOutcome, CalculationError> {
    let shift = |days: i64| {
        input
            .last_period
            .checked_add_signed(TimeDelta::days(days))
            .ok_or_else(|| out_of_range("last_period_date", ValueKind::Date, input.last_period, "date is too far in the future"))
    };

    let ovulation_offset = input.cycle_length - input.luteal_phase;

    Ok(FormulaOutcome {
        headline: Figure::date("ovulation_date", shift(ovulation_offset)?),
        category: None,
        figures: vec![
            Figure::date("fertile_window_start", shift(ovulation_offset - 5)?),
            Figure::date("fertile_window_end", shift(ovulation_offset + 1)?),
            Figure::date("next_period", shift(input.cycle_length)?),
            Figure::date("due_date_if_conceived", shift(PREGNANCY_DAYS)?),
            Figure::count("cycle_length", input.cycle_length),
        ],
    })
}
