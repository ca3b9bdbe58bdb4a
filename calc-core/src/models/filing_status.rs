use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FilingStatusCode {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatusCode {
    pub fn all() -> &'static [FilingStatusCode] {
        &[
            Self::Single,
            Self::MarriedFilingJointly,
            Self::MarriedFilingSeparately,
            Self::HeadOfHousehold,
            Self::QualifyingSurvivingSpouse,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    pub fn to_long_str(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::MarriedFilingJointly => "Married Filing Jointly",
            Self::MarriedFilingSeparately => "Married Filing Separately",
            Self::HeadOfHousehold => "Head of Household",
            Self::QualifyingSurvivingSpouse => "Qualifying Surviving Spouse",
        }
    }

    /// Parses a filing status from its short code (`MFJ`) or its long name
    /// (`married filing jointly`, `married_filing_jointly`). Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "s" | "single" => Some(Self::Single),
            "mfj" | "married filing jointly" => Some(Self::MarriedFilingJointly),
            "mfs" | "married filing separately" => Some(Self::MarriedFilingSeparately),
            "hoh" | "head of household" => Some(Self::HeadOfHousehold),
            "qss" | "qualifying surviving spouse" | "qualifying widow" | "qualifying widower" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FilingStatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_codes_in_any_case() {
        assert_eq!(FilingStatusCode::parse("MFJ"), Some(FilingStatusCode::MarriedFilingJointly));
        assert_eq!(FilingStatusCode::parse("hoh"), Some(FilingStatusCode::HeadOfHousehold));
        assert_eq!(FilingStatusCode::parse(" s "), Some(FilingStatusCode::Single));
    }

    #[test]
    fn parse_accepts_long_names() {
        assert_eq!(
            FilingStatusCode::parse("married_filing_separately"),
            Some(FilingStatusCode::MarriedFilingSeparately)
        );
        assert_eq!(
            FilingStatusCode::parse("Qualifying Surviving Spouse"),
            Some(FilingStatusCode::QualifyingSurvivingSpouse)
        );
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(FilingStatusCode::parse("BOGUS"), None);
        assert_eq!(FilingStatusCode::parse(""), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for status in FilingStatusCode::all() {
            assert_eq!(FilingStatusCode::parse(status.as_str()), Some(*status));
        }
    }
}
