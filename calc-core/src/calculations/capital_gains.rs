//! Federal tax on the gain from selling an asset.
//!
//! The gain is `sale_price - cost_basis - selling_costs`. Assets held more
//! than 365 days are taxed on the long-term capital gains schedule, others on
//! the ordinary schedule. Either way the gain is stacked on top of the
//! seller's other income, so it is taxed at the rates that income leaves
//! available.
//!
//! # Fields
//!
//! | Field                 | Kind     | Default                 |
//! |-----------------------|----------|-------------------------|
//! | `cost_basis`          | currency | required                |
//! | `sale_price`          | currency | required                |
//! | `selling_costs`       | currency | 0                       |
//! | `holding_period_days` | count    | from the two dates      |
//! | `purchase_date`       | date     |                         |
//! | `sale_date`           | date     |                         |
//! | `annual_income`       | currency | 0                       |
//! | `filing_status`       | choice   | single                  |
//! | `tax_year`            | count    | engine default          |
//! | `jurisdiction`        | text     | engine default          |

use rust_decimal::Decimal;

use super::brackets::BracketResolver;
use super::common::{max, round_half_up};
use super::profile::TaxProfile;
use crate::catalog::BracketCatalog;
use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{BracketKind, HoldingPeriod, TaxComputation};
use crate::normalize::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapitalGainsInput {
    pub cost_basis: Decimal,
    pub sale_price: Decimal,
    pub selling_costs: Decimal,
    pub holding_days: i64,
    /// Other taxable income the gain is stacked on.
    pub annual_income: Decimal,
    pub profile: TaxProfile,
}

impl FromFields for CapitalGainsInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let cost_basis = fields.required("cost_basis", ValueKind::Currency)?;
        let sale_price = fields.required("sale_price", ValueKind::Currency)?;
        let selling_costs = fields.or_default("selling_costs", ValueKind::Currency, Decimal::ZERO)?;
        let holding_days = holding_days(fields)?;
        let annual_income = fields.or_default("annual_income", ValueKind::Currency, Decimal::ZERO)?;
        let profile = TaxProfile::from_fields(fields)?;

        Ok(Self {
            cost_basis,
            sale_price,
            selling_costs,
            holding_days,
            annual_income,
            profile,
        })
    }
}

/// `holding_period_days` wins over the purchase and sale dates.
fn holding_days(fields: &Fields<'_>) -> Result<i64, CalculationError> {
    if let Some(days) = fields.optional_count("holding_period_days")? {
        return Ok(days);
    }

    let purchase = fields.optional_date("purchase_date")?;
    let sale = fields.optional_date("sale_date")?;
    match (purchase, sale) {
        (Some(purchase), Some(sale)) => {
            if sale < purchase {
                return Err(out_of_range(
                    "sale_date",
                    ValueKind::Date,
                    sale,
                    format!("is before the purchase date {purchase}"),
                ));
            }
            Ok((sale - purchase).num_days())
        }
        (Some(_), None) => Err(CalculationError::MissingField("sale_date")),
        (None, _) => Err(CalculationError::MissingField("holding_period_days")),
    }
}

pub struct CapitalGainsCalculator<'a> {
    catalog: &'a BracketCatalog,
}

impl<'a> CapitalGainsCalculator<'a> {
    pub fn new(catalog: &'a BracketCatalog) -> Self {
        Self { catalog }
    }

    /// # Errors
    ///
    /// [`CalculationError::NoBracketTable`] when the catalog lacks the table
    /// for the profile and holding period.
    pub fn calculate(
        &self,
        input: &CapitalGainsInput,
    ) -> Result<TaxComputation, CalculationError> {
        let gain = input.sale_price - input.cost_basis - input.selling_costs;
        let holding_period = HoldingPeriod::from_days(input.holding_days);
        let kind = match holding_period {
            HoldingPeriod::ShortTerm => BracketKind::Ordinary,
            HoldingPeriod::LongTerm => BracketKind::LongTermCapitalGains,
        };

        let key = input.profile.table_key(kind);
        let table = self
            .catalog
            .table(&key)
            .ok_or_else(|| CalculationError::NoBracketTable(key.clone()))?;

        let assessment = BracketResolver::new(table).resolve_stacked(input.annual_income, max(gain, Decimal::ZERO));

        Ok(TaxComputation {
            gross_amount: round_half_up(gain),
            taxable_amount: round_half_up(assessment.taxable_amount),
            tax_owed: assessment.tax_owed,
            net_amount: round_half_up(gain - assessment.tax_owed),
            effective_rate: assessment.effective_rate,
            marginal_rate: assessment.marginal_rate,
            breakdown: assessment.breakdown,
            table: key,
            holding_period: Some(holding_period),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::engine::EngineDefaults;
    use crate::models::FilingStatusCode;
    use crate::normalize::NormalizeError;
    use crate::test_support::{inputs, single_filer_catalog};

    fn read(pairs: &[(&str, &str)]) -> Result<CapitalGainsInput, CalculationError> {
        let raw = inputs(pairs);
        let defaults = EngineDefaults::default();
        CapitalGainsInput::from_fields(&Fields::new(&raw, &defaults))
    }

    fn input(
        basis: Decimal,
        sale: Decimal,
        days: i64,
        income: Decimal,
    ) -> CapitalGainsInput {
        CapitalGainsInput {
            cost_basis: basis,
            sale_price: sale,
            selling_costs: Decimal::ZERO,
            holding_days: days,
            annual_income: income,
            profile: TaxProfile {
                jurisdiction: "US".to_string(),
                tax_year: 2026,
                filing_status: FilingStatusCode::Single,
            },
        }
    }

    // =========================================================================
    // reading fields
    // =========================================================================

    #[test]
    fn reads_all_fields() {
        let input = read(&[
            ("cost_basis", "$50,000"),
            ("sale_price", "150000"),
            ("selling_costs", "1,200.50"),
            ("holding_period_days", "400"),
            ("annual_income", "80000"),
            ("filing_status", "married filing jointly"),
        ])
        .unwrap();

        assert_eq!(input.cost_basis, dec!(50000));
        assert_eq!(input.selling_costs, dec!(1200.50));
        assert_eq!(input.holding_days, 400);
        assert_eq!(input.profile.filing_status, FilingStatusCode::MarriedFilingJointly);
        assert_eq!(input.profile.tax_year, 2026);
        assert_eq!(input.profile.jurisdiction, "US");
    }

    #[test]
    fn holding_period_from_dates() {
        let input = read(&[
            ("cost_basis", "100"),
            ("sale_price", "200"),
            ("purchase_date", "2024-01-15"),
            ("sale_date", "01/15/2025"),
        ])
        .unwrap();

        assert_eq!(input.holding_days, 366);
    }

    #[test]
    fn sale_before_purchase_is_out_of_range() {
        let err = read(&[
            ("cost_basis", "100"),
            ("sale_price", "200"),
            ("purchase_date", "2025-06-01"),
            ("sale_date", "2025-05-01"),
        ])
        .unwrap_err();

        assert_eq!(err.field(), Some("sale_date"));
        assert!(matches!(err.normalize_error(), Some(NormalizeError::OutOfRange { .. })));
    }

    #[test]
    fn missing_holding_period() {
        let err = read(&[("cost_basis", "100"), ("sale_price", "200")]).unwrap_err();

        assert_eq!(err, CalculationError::MissingField("holding_period_days"));
    }

    #[test]
    fn unparseable_basis_is_invalid_format() {
        let err = read(&[("cost_basis", "abc"), ("sale_price", "200"), ("holding_period_days", "10")]).unwrap_err();

        assert_eq!(err.field(), Some("cost_basis"));
        assert!(matches!(err.normalize_error(), Some(NormalizeError::InvalidFormat { .. })));
    }

    // =========================================================================
    // calculation
    // =========================================================================

    #[test]
    fn long_term_gain_stacked_on_income() {
        let catalog = single_filer_catalog();
        let result = CapitalGainsCalculator::new(&catalog)
            .calculate(&input(dec!(50000), dec!(150000), 400, dec!(80000)))
            .unwrap();

        assert_eq!(result.holding_period, Some(HoldingPeriod::LongTerm));
        assert_eq!(result.table.kind, BracketKind::LongTermCapitalGains);
        assert_eq!(result.gross_amount, dec!(100000));
        assert_eq!(result.tax_owed, dec!(15000.00));
        assert_eq!(result.effective_rate, dec!(0.15));
        assert_eq!(result.net_amount, dec!(85000.00));
    }

    #[test]
    fn long_term_gain_within_zero_bracket() {
        let catalog = single_filer_catalog();
        let result = CapitalGainsCalculator::new(&catalog)
            .calculate(&input(dec!(0), dec!(44625), 500, dec!(0)))
            .unwrap();

        assert_eq!(result.tax_owed, dec!(0));
        assert_eq!(result.marginal_rate, dec!(0));
    }

    #[test]
    fn short_term_gain_uses_ordinary_table() {
        let catalog = single_filer_catalog();
        let result = CapitalGainsCalculator::new(&catalog)
            .calculate(&input(dec!(10000), dec!(20000), 365, dec!(0)))
            .unwrap();

        assert_eq!(result.holding_period, Some(HoldingPeriod::ShortTerm));
        assert_eq!(result.table.kind, BracketKind::Ordinary);
        assert_eq!(result.tax_owed, dec!(1000.00));
    }

    #[test]
    fn loss_owes_no_tax() {
        let catalog = single_filer_catalog();
        let result = CapitalGainsCalculator::new(&catalog)
            .calculate(&input(dec!(20000), dec!(15000), 400, dec!(50000)))
            .unwrap();

        assert_eq!(result.gross_amount, dec!(-5000));
        assert_eq!(result.taxable_amount, dec!(0));
        assert_eq!(result.tax_owed, dec!(0));
        assert_eq!(result.net_amount, dec!(-5000));
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn missing_table_is_reported() {
        let catalog = single_filer_catalog();
        let mut request = input(dec!(1), dec!(2), 400, dec!(0));
        request.profile.filing_status = FilingStatusCode::HeadOfHousehold;

        let err = CapitalGainsCalculator::new(&catalog).calculate(&request).unwrap_err();

        assert!(matches!(
            err,
            CalculationError::NoBracketTable(key) if key.filing_status == FilingStatusCode::HeadOfHousehold
        ));
    }
}
