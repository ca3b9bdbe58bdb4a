use std::fmt;

use calc_core::{CalculationResult, FigureValue, FormulaOutcome, TaxComputation};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::batch::BatchOutcome;

/// Plain-text view of a result, one labelled value per line.
pub struct Rendered<'a>(pub &'a CalculationResult);

impl fmt::Display for Rendered<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.0 {
            CalculationResult::Tax(tax) => fmt_tax(tax, f),
            CalculationResult::Formula(outcome) => fmt_formula(outcome, f),
        }
    }
}

fn fmt_tax(
    tax: &TaxComputation,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    writeln!(f, "Table:           {}", tax.table)?;
    writeln!(f, "Filing status:   {}", tax.table.filing_status.to_long_str())?;
    if let Some(period) = tax.holding_period {
        writeln!(f, "Holding period:  {}", period.label())?;
    }
    writeln!(f, "Gross amount:    {}", money(tax.gross_amount))?;
    writeln!(f, "Taxable amount:  {}", money(tax.taxable_amount))?;
    writeln!(f, "Tax owed:        {}", money(tax.tax_owed))?;
    writeln!(f, "Net amount:      {}", money(tax.net_amount))?;
    writeln!(f, "Effective rate:  {}", percent(tax.effective_rate))?;
    writeln!(f, "Marginal rate:   {}", percent(tax.marginal_rate))?;

    if !tax.breakdown.is_empty() {
        writeln!(f, "Brackets:")?;
        for slice in &tax.breakdown {
            let upper = slice.upper_bound.map_or_else(|| "and up".to_string(), money);
            writeln!(
                f,
                "  {:>7} on {} to {}: {} taxed, {}",
                percent(slice.rate),
                money(slice.lower_bound),
                upper,
                money(slice.amount_taxed),
                money(slice.tax)
            )?;
        }
    }
    Ok(())
}

fn fmt_formula(
    outcome: &FormulaOutcome,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let width = std::iter::once(&outcome.headline)
        .chain(&outcome.figures)
        .map(|fig| fig.name.len())
        .max()
        .unwrap_or(0)
        .max("category".len());

    writeln!(f, "{:<width$}  {}", outcome.headline.name, figure(&outcome.headline.value))?;
    if let Some(category) = &outcome.category {
        writeln!(f, "{:<width$}  {}", "category", category)?;
    }
    for fig in &outcome.figures {
        writeln!(f, "{:<width$}  {}", fig.name, figure(&fig.value))?;
    }
    Ok(())
}

fn money(d: Decimal) -> String {
    format!("{:.2}", d)
}

fn percent(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}

fn figure(value: &FigureValue) -> String {
    match value {
        FigureValue::Amount(d) => money(*d),
        FigureValue::Rate(r) => percent(*r),
        FigureValue::Quantity { value, unit } => format!("{value} {unit}"),
        FigureValue::Count(n) => n.to_string(),
        FigureValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        FigureValue::Text(s) => s.clone(),
    }
}

pub fn to_json(result: &CalculationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

#[derive(Serialize)]
struct BatchRecord<'a> {
    row: usize,
    tool: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a CalculationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a BatchOutcome> for BatchRecord<'a> {
    fn from(outcome: &'a BatchOutcome) -> Self {
        let (result, error) = match &outcome.result {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            row: outcome.row,
            tool: &outcome.tool,
            result,
            error,
        }
    }
}

/// Batch outcomes as a JSON array; failed rows carry `error` instead of `result`.
pub fn batch_to_json(outcomes: &[BatchOutcome]) -> serde_json::Result<String> {
    let records: Vec<BatchRecord<'_>> = outcomes.iter().map(BatchRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

/// Batch outcomes as text blocks headed by row number and tool.
pub fn batch_to_text(outcomes: &[BatchOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => {
                out.push_str(&format!("# row {} ({})\n", outcome.row, outcome.tool));
                out.push_str(&Rendered(result).to_string());
            }
            Err(e) => out.push_str(&format!("# row {} ({}): error: {e}\n", outcome.row, outcome.tool)),
        }
        out.push('\n');
    }
    out
}
