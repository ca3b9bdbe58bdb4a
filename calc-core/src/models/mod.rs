mod calculation_result;
mod filing_status;
mod raw_input;
mod standard_deduction;
mod tax_bracket;

pub use calculation_result::{
    BracketSlice, CalculationResult, Figure, FigureValue, FormulaOutcome, HoldingPeriod,
    TaxComputation,
};
pub use filing_status::FilingStatusCode;
pub use raw_input::{RawInputs, RawValue};
pub use standard_deduction::StandardDeduction;
pub use tax_bracket::{BracketIssue, BracketKind, BracketTable, InvalidBracketTable, TableKey, TaxBracket};
