//! Federal income tax on ordinary income.
//!
//! Taxable income is the annual income less either the itemized deductions
//! (when given and positive) or the standard deduction for the filing status.

use rust_decimal::Decimal;

use super::brackets::BracketResolver;
use super::common::{max, round_half_up};
use super::profile::TaxProfile;
use crate::catalog::BracketCatalog;
use crate::engine::{CalculationError, Fields, FromFields};
use crate::models::{BracketKind, TaxComputation};
use crate::normalize::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeTaxInput {
    pub annual_income: Decimal,
    pub itemized_deductions: Decimal,
    pub profile: TaxProfile,
}

impl FromFields for IncomeTaxInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        Ok(Self {
            annual_income: fields.required("annual_income", ValueKind::Currency)?,
            itemized_deductions: fields.or_default("itemized_deductions", ValueKind::Currency, Decimal::ZERO)?,
            profile: TaxProfile::from_fields(fields)?,
        })
    }
}

pub struct IncomeTaxCalculator<'a> {
    catalog: &'a BracketCatalog,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(catalog: &'a BracketCatalog) -> Self {
        Self { catalog }
    }

    /// The deduction applied for `input`: itemized when positive, otherwise
    /// the catalog's standard deduction, otherwise zero.
    pub fn deduction(
        &self,
        input: &IncomeTaxInput,
    ) -> Decimal {
        if input.itemized_deductions > Decimal::ZERO {
            return input.itemized_deductions;
        }
        let profile = &input.profile;
        self.catalog
            .standard_deduction(&profile.jurisdiction, profile.tax_year, profile.filing_status)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn calculate(
        &self,
        input: &IncomeTaxInput,
    ) -> Result<TaxComputation, CalculationError> {
        let key = input.profile.table_key(BracketKind::Ordinary);
        let table = self
            .catalog
            .table(&key)
            .ok_or_else(|| CalculationError::NoBracketTable(key.clone()))?;

        let taxable = max(input.annual_income - self.deduction(input), Decimal::ZERO);
        let assessment = BracketResolver::new(table).resolve(taxable);

        Ok(TaxComputation {
            gross_amount: round_half_up(input.annual_income),
            taxable_amount: round_half_up(taxable),
            tax_owed: assessment.tax_owed,
            net_amount: round_half_up(input.annual_income - assessment.tax_owed),
            effective_rate: assessment.effective_rate,
            marginal_rate: assessment.marginal_rate,
            breakdown: assessment.breakdown,
            table: key,
            holding_period: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::FilingStatusCode;
    use crate::test_support::single_filer_catalog;

    fn input(
        income: Decimal,
        itemized: Decimal,
    ) -> IncomeTaxInput {
        IncomeTaxInput {
            annual_income: income,
            itemized_deductions: itemized,
            profile: TaxProfile {
                jurisdiction: "US".to_string(),
                tax_year: 2026,
                filing_status: FilingStatusCode::Single,
            },
        }
    }

    #[test]
    fn standard_deduction_applies_by_default() {
        let catalog = single_filer_catalog();
        let result = IncomeTaxCalculator::new(&catalog)
            .calculate(&input(dec!(75000), dec!(0)))
            .unwrap();

        // 60400 taxable: 1160 + 4266 + 13250 * 0.22
        assert_eq!(result.taxable_amount, dec!(60400));
        assert_eq!(result.tax_owed, dec!(8341.00));
        assert_eq!(result.marginal_rate, dec!(0.22));
        assert_eq!(result.net_amount, dec!(66659.00));
    }

    #[test]
    fn itemized_deduction_replaces_standard() {
        let catalog = single_filer_catalog();
        let calculator = IncomeTaxCalculator::new(&catalog);

        assert_eq!(calculator.deduction(&input(dec!(75000), dec!(20000))), dec!(20000));
        assert_eq!(
            calculator.calculate(&input(dec!(75000), dec!(20000))).unwrap().taxable_amount,
            dec!(55000)
        );
    }

    #[test]
    fn income_below_deduction_owes_nothing() {
        let catalog = single_filer_catalog();
        let result = IncomeTaxCalculator::new(&catalog)
            .calculate(&input(dec!(10000), dec!(0)))
            .unwrap();

        assert_eq!(result.taxable_amount, dec!(0));
        assert_eq!(result.tax_owed, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn missing_standard_deduction_counts_as_zero() {
        let catalog = single_filer_catalog();
        let empty = BracketCatalog::new();
        let request = input(dec!(10000), dec!(0));

        assert_eq!(IncomeTaxCalculator::new(&catalog).deduction(&request), dec!(14600));
        assert_eq!(IncomeTaxCalculator::new(&empty).deduction(&request), dec!(0));
    }
}
