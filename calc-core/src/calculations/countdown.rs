//! Days until the next occurrence of a holiday.
//!
//! The countdown is taken from an explicit `from` date so the result never
//! depends on the clock.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use super::common::round_to;
use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{Figure, FigureValue, FormulaOutcome};
use crate::normalize::ValueKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Holiday {
    NewYear,
    ValentinesDay,
    Easter,
    IndependenceDay,
    Halloween,
    Thanksgiving,
    Christmas,
}

impl Holiday {
    pub fn all() -> &'static [Holiday] {
        &[
            Self::NewYear,
            Self::ValentinesDay,
            Self::Easter,
            Self::IndependenceDay,
            Self::Halloween,
            Self::Thanksgiving,
            Self::Christmas,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewYear => "new-year",
            Self::ValentinesDay => "valentines-day",
            Self::Easter => "easter",
            Self::IndependenceDay => "independence-day",
            Self::Halloween => "halloween",
            Self::Thanksgiving => "thanksgiving",
            Self::Christmas => "christmas",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewYear => "New Year's Day",
            Self::ValentinesDay => "Valentine's Day",
            Self::Easter => "Easter",
            Self::IndependenceDay => "Independence Day",
            Self::Halloween => "Halloween",
            Self::Thanksgiving => "Thanksgiving",
            Self::Christmas => "Christmas",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "newyear" | "newyears" | "newyearsday" => Some(Self::NewYear),
            "valentinesday" | "valentines" | "valentine" => Some(Self::ValentinesDay),
            "easter" | "eastersunday" => Some(Self::Easter),
            "independenceday" | "july4" | "fourthofjuly" => Some(Self::IndependenceDay),
            "halloween" => Some(Self::Halloween),
            "thanksgiving" => Some(Self::Thanksgiving),
            "christmas" | "christmasday" | "xmas" => Some(Self::Christmas),
            _ => None,
        }
    }

    /// The holiday's date in `year`, `None` outside chrono's calendar range.
    pub fn date_in(
        &self,
        year: i32,
    ) -> Option<NaiveDate> {
        match self {
            Self::NewYear => NaiveDate::from_ymd_opt(year, 1, 1),
            Self::ValentinesDay => NaiveDate::from_ymd_opt(year, 2, 14),
            Self::Easter => easter_sunday(year),
            Self::IndependenceDay => NaiveDate::from_ymd_opt(year, 7, 4),
            Self::Halloween => NaiveDate::from_ymd_opt(year, 10, 31),
            Self::Thanksgiving => NaiveDate::from_weekday_of_month_opt(year, 11, Weekday::Thu, 4),
            Self::Christmas => NaiveDate::from_ymd_opt(year, 12, 25),
        }
    }

    /// First occurrence on or after `from`.
    pub fn next_after(
        &self,
        from: NaiveDate,
    ) -> Option<NaiveDate> {
        match self.date_in(from.year()) {
            Some(date) if date >= from => Some(date),
            _ => self.date_in(from.year() + 1),
        }
    }
}

impl fmt::Display for Holiday {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Western Easter by the anonymous Gregorian computus.
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownInput {
    pub holiday: Holiday,
    pub from: NaiveDate,
}

impl FromFields for CountdownInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let holiday = fields
            .choice("holiday", Holiday::parse)?
            .ok_or(CalculationError::MissingField("holiday"))?;
        let from = fields.required_date("from")?;
        Ok(Self { holiday, from })
    }
}

pub fn calculate(input: &CountdownInput) -> Result<FormulaOutcome, CalculationError> {
    let target = input
        .holiday
        .next_after(input.from)
        .ok_or_else(|| out_of_range("from", ValueKind::Date, input.from, "no later occurrence in the calendar"))?;
    let days = (target - input.from).num_days();

    Ok(FormulaOutcome {
        headline: Figure::count("days", days),
        category: Some(input.holiday.name().to_string()),
        figures: vec![
            Figure::date("date", target),
            Figure::quantity("weeks", round_to(Decimal::from(days) / Decimal::from(7), 1), "weeks"),
            Figure::new("weekday", FigureValue::Text(target.format("%A").to_string())),
        ],
    })
}
