use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{BracketTable, FilingStatusCode, StandardDeduction, TableKey};

/// In-memory store of validated bracket tables and standard deductions.
///
/// Typical lifetime:
/// 1. Create with `BracketCatalog::new()`.
/// 2. Call `insert` once per table while configuration is loaded.
/// 3. Hand the catalog to a [`CalculationEngine`](crate::engine::CalculationEngine),
///    which only ever reads from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketCatalog {
    tables: BTreeMap<TableKey, BracketTable>,
    deductions: BTreeMap<(String, i32, FilingStatusCode), StandardDeduction>,
}

impl BracketCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. A table already stored under the same key is replaced
    /// and returned.
    pub fn insert(
        &mut self,
        table: BracketTable,
    ) -> Option<BracketTable> {
        self.tables.insert(table.key().clone(), table)
    }

    /// Add a standard deduction, replacing any previous amount for the same
    /// jurisdiction, year and filing status.
    pub fn insert_standard_deduction(
        &mut self,
        deduction: StandardDeduction,
    ) -> Option<StandardDeduction> {
        let key = (
            deduction.jurisdiction.clone(),
            deduction.tax_year,
            deduction.filing_status,
        );
        self.deductions.insert(key, deduction)
    }

    pub fn table(
        &self,
        key: &TableKey,
    ) -> Option<&BracketTable> {
        self.tables.get(key)
    }

    pub fn standard_deduction(
        &self,
        jurisdiction: &str,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Option<Decimal> {
        self.deductions
            .get(&(jurisdiction.to_string(), tax_year, filing_status))
            .map(|d| d.amount)
    }

    /// Distinct tax years with at least one table for `jurisdiction`, ascending.
    pub fn tax_years(
        &self,
        jurisdiction: &str,
    ) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .tables
            .keys()
            .filter(|k| k.jurisdiction == jurisdiction)
            .map(|k| k.tax_year)
            .collect();
        years.dedup();
        years
    }

    /// Every table key, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &TableKey> {
        self.tables.keys()
    }

    pub fn tables(&self) -> impl Iterator<Item = &BracketTable> {
        self.tables.values()
    }

    pub fn deductions(&self) -> impl Iterator<Item = &StandardDeduction> {
        self.deductions.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
