use std::fmt;

use serde::{Deserialize, Serialize};

/// Every calculator the engine can run, keyed by the id used in URLs and on
/// the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    CapitalGains,
    IncomeTax,
    Bmi,
    PaintCost,
    RentAffordability,
    PropertyTax,
    Ovulation,
    PasswordStrength,
    HolidayCountdown,
    UnitConversion,
}

impl ToolId {
    pub fn all() -> &'static [ToolId] {
        &[
            Self::CapitalGains,
            Self::IncomeTax,
            Self::Bmi,
            Self::PaintCost,
            Self::RentAffordability,
            Self::PropertyTax,
            Self::Ovulation,
            Self::PasswordStrength,
            Self::HolidayCountdown,
            Self::UnitConversion,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapitalGains => "capital-gains",
            Self::IncomeTax => "income-tax",
            Self::Bmi => "bmi",
            Self::PaintCost => "paint-cost",
            Self::RentAffordability => "rent-affordability",
            Self::PropertyTax => "property-tax",
            Self::Ovulation => "ovulation",
            Self::PasswordStrength => "password-strength",
            Self::HolidayCountdown => "holiday-countdown",
            Self::UnitConversion => "unit-conversion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CapitalGains => "Federal tax on the gain from selling an asset",
            Self::IncomeTax => "Federal income tax after the standard or itemized deduction",
            Self::Bmi => "Body mass index and healthy weight range",
            Self::PaintCost => "Gallons and cans of paint needed for a wall area",
            Self::RentAffordability => "Monthly rent supported by an income",
            Self::PropertyTax => "Annual and monthly property tax",
            Self::Ovulation => "Ovulation date and fertile window",
            Self::PasswordStrength => "Password entropy estimate",
            Self::HolidayCountdown => "Days until the next occurrence of a holiday",
            Self::UnitConversion => "Convert between units of mass, length or area",
        }
    }

    /// Whether the tool needs a bracket table from the catalog.
    pub fn uses_brackets(&self) -> bool {
        matches!(self, Self::CapitalGains | Self::IncomeTax)
    }

    /// Parses a tool id. Case-insensitive; underscores are accepted in place
    /// of hyphens.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::all().iter().copied().find(|tool| tool.as_str() == normalized)
    }
}

impl fmt::Display for ToolId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
