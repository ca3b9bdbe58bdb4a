use std::collections::BTreeMap;
use std::io::Read;

use calc_core::{
    BracketKind, BracketTable, FilingStatusCode, InvalidBracketTable, StandardDeduction, TableKey, TaxBracket,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading bracket or deduction data.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid bracket kind: {0}")]
    InvalidKind(String),

    #[error("Invalid filing status: {0}")]
    InvalidFilingStatus(String),

    #[error(transparent)]
    InvalidTable(#[from] InvalidBracketTable),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> Self {
        LoaderError::CsvParse(err.to_string())
    }
}

/// Maps IRS schedule codes to filing status codes.
///
/// - Schedule X → Single (S)
/// - Schedule Y-1 → Married Filing Jointly (MFJ) and Qualifying Surviving Spouse (QSS)
/// - Schedule Y-2 → Married Filing Separately (MFS)
/// - Schedule Z → Head of Household (HOH)
pub fn schedule_to_filing_statuses(schedule: &str) -> Result<Vec<FilingStatusCode>, LoaderError> {
    match schedule.trim() {
        "X" => Ok(vec![FilingStatusCode::Single]),
        "Y-1" => Ok(vec![
            FilingStatusCode::MarriedFilingJointly,
            FilingStatusCode::QualifyingSurvivingSpouse,
        ]),
        "Y-2" => Ok(vec![FilingStatusCode::MarriedFilingSeparately]),
        "Z" => Ok(vec![FilingStatusCode::HeadOfHousehold]),
        _ => Err(LoaderError::InvalidSchedule(schedule.to_string())),
    }
}

/// A single record from the tax brackets CSV file.
///
/// - `jurisdiction`: e.g. `US`
/// - `tax_year`: e.g. 2026
/// - `kind`: `ordinary` or `long_term_capital_gains`
/// - `schedule`: the IRS schedule code (X, Y-1, Y-2, Z)
/// - `lower_bound`: first dollar of the bracket (inclusive)
/// - `upper_bound`: end of the bracket (exclusive, empty for unbounded)
/// - `rate`: the marginal rate as a decimal (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub jurisdiction: String,
    pub tax_year: i32,
    pub kind: String,
    pub schedule: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

/// Loader for bracket tables from CSV files.
///
/// The CSV uses IRS schedule codes (X, Y-1, Y-2, Z) which are mapped to the
/// filing statuses they cover. Every table is validated as it is built.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
        let mut csv_reader = csv_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into validated tables.
    ///
    /// Records are grouped by (jurisdiction, tax_year, kind, schedule);
    /// within a group the file order is kept. Schedule Y-1 produces two
    /// identical tables, one for MFJ and one for QSS.
    ///
    /// # Errors
    ///
    /// * [`LoaderError::InvalidSchedule`] / [`LoaderError::InvalidKind`] for
    ///   unknown codes.
    /// * [`LoaderError::InvalidTable`] when a group fails bracket validation.
    pub fn build(records: &[BracketRecord]) -> Result<Vec<BracketTable>, LoaderError> {
        let mut groups: BTreeMap<(String, i32, String, String), Vec<&BracketRecord>> = BTreeMap::new();

        for record in records {
            groups
                .entry((
                    record.jurisdiction.trim().to_ascii_uppercase(),
                    record.tax_year,
                    record.kind.clone(),
                    record.schedule.clone(),
                ))
                .or_default()
                .push(record);
        }

        let mut tables = Vec::new();
        for ((jurisdiction, tax_year, kind, schedule), group_records) in groups {
            let kind = BracketKind::parse(&kind).ok_or_else(|| LoaderError::InvalidKind(kind.clone()))?;
            let brackets: Vec<TaxBracket> = group_records
                .iter()
                .map(|r| TaxBracket::new(r.lower_bound, r.upper_bound, r.rate))
                .collect();

            for filing_status in schedule_to_filing_statuses(&schedule)? {
                let key = TableKey::new(jurisdiction.clone(), tax_year, filing_status, kind);
                tables.push(BracketTable::new(key, brackets.clone())?);
            }
        }

        Ok(tables)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<Vec<BracketTable>, LoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}

/// A single record from the standard deductions CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandardDeductionRecord {
    pub jurisdiction: String,
    pub tax_year: i32,
    pub filing_status: String,
    pub amount: Decimal,
}

/// Loader for standard deduction amounts, one row per filing status.
pub struct StandardDeductionLoader;

impl StandardDeductionLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<StandardDeductionRecord>, LoaderError> {
        let mut csv_reader = csv_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: StandardDeductionRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn build(records: &[StandardDeductionRecord]) -> Result<Vec<StandardDeduction>, LoaderError> {
        records
            .iter()
            .map(|record| {
                let filing_status = FilingStatusCode::parse(&record.filing_status)
                    .ok_or_else(|| LoaderError::InvalidFilingStatus(record.filing_status.clone()))?;
                Ok(StandardDeduction {
                    jurisdiction: record.jurisdiction.trim().to_ascii_uppercase(),
                    tax_year: record.tax_year,
                    filing_status,
                    amount: record.amount,
                })
            })
            .collect()
    }

    pub fn load<R: Read>(reader: R) -> Result<Vec<StandardDeduction>, LoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }
}

#[cfg(test)]
mod tests {
    use calc_core::BracketIssue;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "jurisdiction,tax_year,kind,schedule,lower_bound,upper_bound,rate";

    const TEST_CSV: &str = r#"jurisdiction,tax_year,kind,schedule,lower_bound,upper_bound,rate
US,2026,long_term_capital_gains,X,0,44625,0
US,2026,long_term_capital_gains,X,44625,492300,0.15
US,2026,long_term_capital_gains,X,492300,,0.20
US,2026,long_term_capital_gains,Y-1,0,89250,0
US,2026,long_term_capital_gains,Y-1,89250,553850,0.15
US,2026,long_term_capital_gains,Y-1,553850,,0.20
US,2026,long_term_capital_gains,Y-2,0,44625,0
US,2026,long_term_capital_gains,Y-2,44625,276900,0.15
US,2026,long_term_capital_gains,Y-2,276900,,0.20
US,2026,long_term_capital_gains,Z,0,59750,0
US,2026,long_term_capital_gains,Z,59750,523050,0.15
US,2026,long_term_capital_gains,Z,523050,,0.20
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = format!("{HEADER}\nUS,2026,ordinary,X,0,11600,0.10");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            BracketRecord {
                jurisdiction: "US".to_string(),
                tax_year: 2026,
                kind: "ordinary".to_string(),
                schedule: "X".to_string(),
                lower_bound: dec!(0),
                upper_bound: Some(dec!(11600)),
                rate: dec!(0.10),
            }
        );
    }

    #[test]
    fn test_parse_csv_unbounded_upper() {
        let csv = format!("{HEADER}\nUS,2026,ordinary,X,609350,,0.37");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].lower_bound, dec!(609350));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let csv = format!("{HEADER}\n US , 2026 , ordinary , X , 0 , 11600 , 0.10 ");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].schedule, "X");
        assert_eq!(records[0].rate, dec!(0.10));
    }

    #[test]
    fn test_build_maps_schedules_to_statuses() {
        let tables = BracketTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load");

        // Y-1 yields both MFJ and QSS
        assert_eq!(tables.len(), 5);

        let mut statuses: Vec<_> = tables.iter().map(|t| t.key().filing_status).collect();
        statuses.sort();
        assert_eq!(statuses, FilingStatusCode::all().to_vec());

        for table in &tables {
            assert_eq!(table.key().kind, BracketKind::LongTermCapitalGains);
            assert_eq!(table.brackets().len(), 3);
        }
    }

    #[test]
    fn test_build_keeps_file_order_within_group() {
        let tables = BracketTableLoader::load(TEST_CSV.as_bytes()).expect("Failed to load");
        let single = tables
            .iter()
            .find(|t| t.key().filing_status == FilingStatusCode::Single)
            .expect("single table");

        assert_eq!(single.brackets()[0].upper_bound, Some(dec!(44625)));
        assert_eq!(single.brackets()[2].upper_bound, None);
    }

    #[test]
    fn test_build_rejects_gap() {
        let csv = format!("{HEADER}\nUS,2026,ordinary,X,0,11600,0.10\nUS,2026,ordinary,X,11700,,0.12");

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("gap should be rejected");

        let LoaderError::InvalidTable(invalid) = err else {
            panic!("Expected InvalidTable, got: {err:?}");
        };
        assert!(matches!(invalid.issue, BracketIssue::NotContiguous { index: 1, .. }));
    }

    #[test]
    fn test_build_rejects_unknown_kind() {
        let csv = format!("{HEADER}\nUS,2026,estate,X,0,,0.40");

        let err = BracketTableLoader::load(csv.as_bytes()).expect_err("kind should be rejected");

        assert!(matches!(err, LoaderError::InvalidKind(ref kind) if kind == "estate"));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "jurisdiction,tax_year,kind\nUS,2026,ordinary";

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let LoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "Expected 'missing field' in error, got: {}", msg);
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = format!("{HEADER}\nUS,2026,ordinary,X,abc,11600,0.10");

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("Should fail for invalid decimal");

        assert!(matches!(err, LoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv = format!("{HEADER}\n");

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
        assert!(BracketTableLoader::build(&records).unwrap().is_empty());
    }

    #[test]
    fn test_schedule_to_filing_statuses() {
        assert_eq!(schedule_to_filing_statuses("X").unwrap(), vec![FilingStatusCode::Single]);
        assert_eq!(
            schedule_to_filing_statuses("Y-1").unwrap(),
            vec![
                FilingStatusCode::MarriedFilingJointly,
                FilingStatusCode::QualifyingSurvivingSpouse
            ]
        );
        assert_eq!(
            schedule_to_filing_statuses("Y-2").unwrap(),
            vec![FilingStatusCode::MarriedFilingSeparately]
        );
        assert_eq!(schedule_to_filing_statuses("Z").unwrap(), vec![FilingStatusCode::HeadOfHousehold]);
    }

    #[test]
    fn test_schedule_to_filing_statuses_invalid() {
        match schedule_to_filing_statuses("INVALID") {
            Err(LoaderError::InvalidSchedule(ref schedule)) => assert_eq!(schedule, "INVALID"),
            other => panic!("expected InvalidSchedule, got {other:?}"),
        }
    }

    #[test]
    fn test_standard_deductions() {
        let csv = "jurisdiction,tax_year,filing_status,amount\nus,2026,S,14600\nUS,2026,Head of Household,21900";

        let deductions = StandardDeductionLoader::load(csv.as_bytes()).expect("Failed to load");

        assert_eq!(
            deductions,
            vec![
                StandardDeduction {
                    jurisdiction: "US".to_string(),
                    tax_year: 2026,
                    filing_status: FilingStatusCode::Single,
                    amount: dec!(14600),
                },
                StandardDeduction {
                    jurisdiction: "US".to_string(),
                    tax_year: 2026,
                    filing_status: FilingStatusCode::HeadOfHousehold,
                    amount: dec!(21900),
                },
            ]
        );
    }

    #[test]
    fn test_standard_deductions_reject_unknown_status() {
        let csv = "jurisdiction,tax_year,filing_status,amount\nUS,2026,Widow,1";

        let err = StandardDeductionLoader::load(csv.as_bytes()).expect_err("status should be rejected");

        assert!(matches!(err, LoaderError::InvalidFilingStatus(_)));
    }
}
