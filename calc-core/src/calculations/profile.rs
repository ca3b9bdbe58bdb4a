use crate::engine::{CalculationError, Fields, FromFields, out_of_range};
use crate::models::{BracketKind, FilingStatusCode, TableKey};
use crate::normalize::ValueKind;

/// Who is paying and under which rules: selects the bracket tables for a
/// tax calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxProfile {
    pub jurisdiction: String,
    pub tax_year: i32,
    pub filing_status: FilingStatusCode,
}

impl TaxProfile {
    pub fn table_key(
        &self,
        kind: BracketKind,
    ) -> TableKey {
        TableKey::new(self.jurisdiction.clone(), self.tax_year, self.filing_status, kind)
    }
}

/// Reads `jurisdiction`, `tax_year` and `filing_status`; the first two fall
/// back to the engine defaults and the filing status to single.
impl FromFields for TaxProfile {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let defaults = fields.defaults();

        let jurisdiction = fields
            .raw("jurisdiction")
            .map(|raw| raw.as_text().trim().to_ascii_uppercase())
            .unwrap_or_else(|| defaults.jurisdiction.clone());

        let tax_year = match fields.optional_count("tax_year")? {
            Some(year) => i32::try_from(year).map_err(|_| {
                out_of_range("tax_year", ValueKind::Count, year, "is not a calendar year")
            })?,
            None => defaults.tax_year,
        };

        let filing_status = fields
            .choice("filing_status", FilingStatusCode::parse)?
            .unwrap_or_default();

        Ok(Self {
            jurisdiction,
            tax_year,
            filing_status,
        })
    }
}
