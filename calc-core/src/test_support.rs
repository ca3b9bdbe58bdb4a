//! Fixtures shared by the unit tests in this crate.

use rust_decimal_macros::dec;

use crate::catalog::BracketCatalog;
use crate::models::{
    BracketKind, BracketTable, FilingStatusCode, RawInputs, RawValue, StandardDeduction, TableKey, TaxBracket,
};

pub fn ordinary_single_2026() -> BracketTable {
    BracketTable::new(
        TableKey::new("US", 2026, FilingStatusCode::Single, BracketKind::Ordinary),
        vec![
            TaxBracket::new(dec!(0), Some(dec!(11600)), dec!(0.10)),
            TaxBracket::new(dec!(11600), Some(dec!(47150)), dec!(0.12)),
            TaxBracket::new(dec!(47150), Some(dec!(100525)), dec!(0.22)),
            TaxBracket::new(dec!(100525), Some(dec!(191950)), dec!(0.24)),
            TaxBracket::new(dec!(191950), Some(dec!(243725)), dec!(0.32)),
            TaxBracket::new(dec!(243725), Some(dec!(609350)), dec!(0.35)),
            TaxBracket::new(dec!(609350), None, dec!(0.37)),
        ],
    )
    .expect("valid table")
}

pub fn ltcg_single_2026() -> BracketTable {
    BracketTable::new(
        TableKey::new("US", 2026, FilingStatusCode::Single, BracketKind::LongTermCapitalGains),
        vec![
            TaxBracket::new(dec!(0), Some(dec!(44625)), dec!(0)),
            TaxBracket::new(dec!(44625), Some(dec!(492300)), dec!(0.15)),
            TaxBracket::new(dec!(492300), None, dec!(0.20)),
        ],
    )
    .expect("valid table")
}

/// Single-filer 2026 tables and standard deduction only.
pub fn single_filer_catalog() -> BracketCatalog {
    let mut catalog = BracketCatalog::new();
    catalog.insert(ordinary_single_2026());
    catalog.insert(ltcg_single_2026());
    catalog.insert_standard_deduction(StandardDeduction {
        jurisdiction: "US".to_string(),
        tax_year: 2026,
        filing_status: FilingStatusCode::Single,
        amount: dec!(14600),
    });
    catalog
}

pub fn inputs(pairs: &[(&str, &str)]) -> RawInputs {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), RawValue::from(*value)))
        .collect()
}
