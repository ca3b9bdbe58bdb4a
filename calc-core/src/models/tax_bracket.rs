use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::FilingStatusCode;

/// One progressive bracket: income in `[lower_bound, upper_bound)` is taxed
/// at `rate`. An `upper_bound` of `None` means the bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    /// Ordinary income schedule, also used for short-term gains.
    Ordinary,
    /// Preferential schedule for gains on assets held more than a year.
    LongTermCapitalGains,
}

impl BracketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::LongTermCapitalGains => "long_term_capital_gains",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinary" => Some(Self::Ordinary),
            "long_term_capital_gains" | "long_term" | "ltcg" => Some(Self::LongTermCapitalGains),
            _ => None,
        }
    }
}

impl fmt::Display for BracketKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a bracket table within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey {
    pub jurisdiction: String,
    pub tax_year: i32,
    pub filing_status: FilingStatusCode,
    pub kind: BracketKind,
}

impl TableKey {
    pub fn new(
        jurisdiction: impl Into<String>,
        tax_year: i32,
        filing_status: FilingStatusCode,
        kind: BracketKind,
    ) -> Self {
        Self {
            jurisdiction: jurisdiction.into(),
            tax_year,
            filing_status,
            kind,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.jurisdiction, self.tax_year, self.filing_status, self.kind
        )
    }
}

/// Integrity problems detected when a bracket table is constructed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketIssue {
    #[error("table has no brackets")]
    Empty,

    #[error("first bracket must start at 0, starts at {0}")]
    FirstBracketNotAtZero(Decimal),

    #[error("bracket {index} has an empty range [{lower}, {upper})")]
    EmptyRange {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} starts at {found}, expected {expected} (brackets must be sorted and contiguous)")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(usize),

    #[error("last bracket must be unbounded, ends at {0}")]
    BoundedLastBracket(Decimal),

    #[error("bracket {index} rate {rate} is outside 0..=1")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} rate {rate} is lower than the previous rate {previous}")]
    DecreasingRate {
        index: usize,
        rate: Decimal,
        previous: Decimal,
    },
}

/// A bracket table failed validation. Raised while configuration is loaded,
/// never per calculation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid bracket table {key}: {issue}")]
pub struct InvalidBracketTable {
    pub key: TableKey,
    #[source]
    pub issue: BracketIssue,
}

/// An ordered, validated set of brackets for one jurisdiction, year, filing
/// status and schedule.
///
/// The only way to obtain a `BracketTable` is [`BracketTable::new`], so every
/// table in circulation is sorted, contiguous from zero, ends with an
/// unbounded bracket and has non-decreasing rates in `0..=1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTable {
    key: TableKey,
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(
        key: TableKey,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, InvalidBracketTable> {
        if let Err(issue) = Self::validate(&brackets) {
            return Err(InvalidBracketTable { key, issue });
        }
        Ok(Self { key, brackets })
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    fn validate(brackets: &[TaxBracket]) -> Result<(), BracketIssue> {
        let first = brackets.first().ok_or(BracketIssue::Empty)?;
        if first.lower_bound != Decimal::ZERO {
            return Err(BracketIssue::FirstBracketNotAtZero(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        let mut expected_lower = Decimal::ZERO;
        let mut previous_rate = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.lower_bound != expected_lower {
                return Err(BracketIssue::NotContiguous {
                    index,
                    expected: expected_lower,
                    found: bracket.lower_bound,
                });
            }
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketIssue::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            if bracket.rate < previous_rate {
                return Err(BracketIssue::DecreasingRate {
                    index,
                    rate: bracket.rate,
                    previous: previous_rate,
                });
            }
            previous_rate = bracket.rate;

            match bracket.upper_bound {
                Some(upper) if index == last_index => {
                    return Err(BracketIssue::BoundedLastBracket(upper));
                }
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(BracketIssue::EmptyRange {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(upper) => expected_lower = upper,
                None if index != last_index => {
                    return Err(BracketIssue::UnboundedBeforeEnd(index));
                }
                None => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn key() -> TableKey {
        TableKey::new("US", 2026, FilingStatusCode::Single, BracketKind::LongTermCapitalGains)
    }

    fn ltcg_single() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new(dec!(0), Some(dec!(44625)), dec!(0)),
            TaxBracket::new(dec!(44625), Some(dec!(492300)), dec!(0.15)),
            TaxBracket::new(dec!(492300), None, dec!(0.20)),
        ]
    }

    fn issue(brackets: Vec<TaxBracket>) -> BracketIssue {
        BracketTable::new(key(), brackets)
            .expect_err("table should be rejected")
            .issue
    }

    #[test]
    fn accepts_well_formed_table() {
        let table = BracketTable::new(key(), ltcg_single()).expect("valid table");

        assert_eq!(table.brackets().len(), 3);
        assert_eq!(table.key(), &key());
    }

    #[test]
    fn accepts_single_flat_bracket() {
        let table = BracketTable::new(key(), vec![TaxBracket::new(dec!(0), None, dec!(0.05))]);

        assert!(table.is_ok());
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(issue(vec![]), BracketIssue::Empty);
    }

    #[test]
    fn rejects_table_not_starting_at_zero() {
        let mut brackets = ltcg_single();
        brackets[0].lower_bound = dec!(100);

        assert_eq!(issue(brackets), BracketIssue::FirstBracketNotAtZero(dec!(100)));
    }

    #[test]
    fn rejects_gap_between_brackets() {
        let mut brackets = ltcg_single();
        brackets[1].lower_bound = dec!(44626);

        assert_eq!(
            issue(brackets),
            BracketIssue::NotContiguous {
                index: 1,
                expected: dec!(44625),
                found: dec!(44626),
            }
        );
    }

    #[test]
    fn rejects_unsorted_brackets() {
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(44625)), dec!(0)),
            TaxBracket::new(dec!(492300), None, dec!(0.20)),
            TaxBracket::new(dec!(44625), Some(dec!(492300)), dec!(0.15)),
        ];

        assert!(matches!(issue(brackets), BracketIssue::NotContiguous { index: 1, .. }));
    }

    #[test]
    fn rejects_empty_range() {
        let brackets = vec![
            TaxBracket::new(dec!(0), Some(dec!(0)), dec!(0)),
            TaxBracket::new(dec!(0), None, dec!(0.15)),
        ];

        assert!(matches!(issue(brackets), BracketIssue::EmptyRange { index: 0, .. }));
    }

    #[test]
    fn rejects_unbounded_bracket_before_end() {
        let brackets = vec![
            TaxBracket::new(dec!(0), None, dec!(0)),
            TaxBracket::new(dec!(44625), None, dec!(0.15)),
        ];

        assert_eq!(issue(brackets), BracketIssue::UnboundedBeforeEnd(0));
    }

    #[test]
    fn rejects_bounded_last_bracket() {
        let mut brackets = ltcg_single();
        brackets[2].upper_bound = Some(dec!(1000000));

        assert_eq!(issue(brackets), BracketIssue::BoundedLastBracket(dec!(1000000)));
    }

    #[test]
    fn rejects_rate_above_one() {
        let mut brackets = ltcg_single();
        brackets[2].rate = dec!(1.5);

        assert_eq!(
            issue(brackets),
            BracketIssue::RateOutOfRange {
                index: 2,
                rate: dec!(1.5),
            }
        );
    }

    #[test]
    fn rejects_decreasing_rates() {
        let mut brackets = ltcg_single();
        brackets[2].rate = dec!(0.10);

        assert!(matches!(issue(brackets), BracketIssue::DecreasingRate { index: 2, .. }));
    }

    #[test]
    fn error_message_names_the_table() {
        let err = BracketTable::new(key(), vec![]).unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid bracket table US 2026 S long_term_capital_gains: table has no brackets"
        );
    }
}
