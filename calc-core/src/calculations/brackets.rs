//! Progressive tax over a [`BracketTable`].
//!
//! Each bracket covers `[lower_bound, upper_bound)`: the lower bound is
//! inclusive and the upper bound exclusive, so an amount that lands exactly
//! on a boundary is never counted twice.
//!
//! Tax is computed on a slice of income `[base, base + amount)`. For plain
//! income tax `base` is zero. For capital gains `base` is the taxpayer's
//! other income, which the gain is stacked on top of.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use calc_core::calculations::BracketResolver;
//! use calc_core::{BracketKind, BracketTable, FilingStatusCode, TableKey, TaxBracket};
//!
//! let table = BracketTable::new(
//!     TableKey::new("US", 2026, FilingStatusCode::Single, BracketKind::LongTermCapitalGains),
//!     vec![
//!         TaxBracket::new(dec!(0), Some(dec!(44625)), dec!(0)),
//!         TaxBracket::new(dec!(44625), Some(dec!(492300)), dec!(0.15)),
//!         TaxBracket::new(dec!(492300), None, dec!(0.20)),
//!     ],
//! )
//! .unwrap();
//!
//! let assessment = BracketResolver::new(&table).resolve_stacked(dec!(80000), dec!(100000));
//!
//! assert_eq!(assessment.tax_owed, dec!(15000.00));
//! assert_eq!(assessment.effective_rate, dec!(0.15));
//! assert_eq!(assessment.marginal_rate, dec!(0.15));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{max, round_half_up, round_rate};
use crate::models::{BracketSlice, BracketTable};

/// Outcome of running an amount through a bracket table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketAssessment {
    /// Amount that was taxed (negative input is clamped to zero).
    pub taxable_amount: Decimal,

    /// Total tax, rounded to cents.
    pub tax_owed: Decimal,

    /// `tax / taxable_amount`, computed before rounding the tax and then
    /// rounded to four places. Zero when nothing is taxable.
    pub effective_rate: Decimal,

    /// Rate of the highest bracket that received part of the amount.
    pub marginal_rate: Decimal,

    /// One entry per bracket that received a non-zero portion, ascending.
    pub breakdown: Vec<BracketSlice>,
}

impl BracketAssessment {
    fn nothing_taxable() -> Self {
        Self {
            taxable_amount: Decimal::ZERO,
            tax_owed: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            marginal_rate: Decimal::ZERO,
            breakdown: Vec::new(),
        }
    }
}

/// Applies a validated bracket table to taxable amounts.
///
/// The table is validated when it is built, so resolving never fails.
#[derive(Debug, Clone, Copy)]
pub struct BracketResolver<'a> {
    table: &'a BracketTable,
}

impl<'a> BracketResolver<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Taxes `amount` starting from zero.
    pub fn resolve(
        &self,
        amount: Decimal,
    ) -> BracketAssessment {
        self.resolve_stacked(Decimal::ZERO, amount)
    }

    /// Taxes the slice `[base, base + amount)`.
    ///
    /// Amounts at or below zero yield zero tax, a zero marginal rate and an
    /// empty breakdown. A negative `base` is treated as zero.
    pub fn resolve_stacked(
        &self,
        base: Decimal,
        amount: Decimal,
    ) -> BracketAssessment {
        if amount <= Decimal::ZERO {
            return BracketAssessment::nothing_taxable();
        }

        let start = max(base, Decimal::ZERO);
        let end = start + amount;

        let mut total_tax = Decimal::ZERO;
        let mut marginal_rate = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for bracket in self.table.brackets() {
            if let Some(upper) = bracket.upper_bound {
                if upper <= start {
                    continue;
                }
            }

            let portion = self.portion_in_bracket(bracket.lower_bound, bracket.upper_bound, start, end);
            if portion > Decimal::ZERO {
                let tax = portion * bracket.rate;
                total_tax += tax;
                marginal_rate = bracket.rate;
                breakdown.push(BracketSlice {
                    lower_bound: bracket.lower_bound,
                    upper_bound: bracket.upper_bound,
                    rate: bracket.rate,
                    amount_taxed: portion,
                    tax: round_half_up(tax),
                });
            }

            if bracket.upper_bound.is_none_or(|upper| end <= upper) {
                break;
            }
        }

        BracketAssessment {
            taxable_amount: amount,
            tax_owed: round_half_up(total_tax),
            effective_rate: round_rate(total_tax / amount),
            marginal_rate,
            breakdown,
        }
    }

    /// Length of the overlap between `[lower, upper)` and `[start, end)`.
    fn portion_in_bracket(
        &self,
        lower: Decimal,
        upper: Option<Decimal>,
        start: Decimal,
        end: Decimal,
    ) -> Decimal {
        let from = max(lower, start);
        let to = upper.map_or(end, |upper| upper.min(end));
        max(to - from, Decimal::ZERO)
    }
}
