//! The single entry point that turns a tool id and raw form fields into a
//! [`CalculationResult`].
//!
//! ```
//! use calc_core::{BracketCatalog, CalculationEngine, EngineDefaults, RawInputs};
//!
//! let engine = CalculationEngine::new(BracketCatalog::new(), EngineDefaults::default());
//! let inputs: RawInputs = [("weight", "70 kg"), ("height", "175 cm")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.into()))
//!     .collect();
//!
//! let result = engine.calculate("bmi", &inputs).unwrap();
//! assert_eq!(result.as_formula().unwrap().category.as_deref(), Some("Normal weight"));
//! ```

mod error;
mod fields;
mod tool;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::CalculationError;
pub use fields::{Fields, FromFields, invalid, out_of_range};
pub use tool::ToolId;

use crate::catalog::BracketCatalog;
use crate::calculations::{
    CapitalGainsCalculator, CapitalGainsInput, IncomeTaxCalculator, IncomeTaxInput, bmi, countdown, ovulation,
    paint, password, property_tax, rent, unit_conversion,
};
use crate::models::{CalculationResult, RawInputs};

/// Values used when a tax request leaves `jurisdiction` or `tax_year` out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDefaults {
    pub jurisdiction: String,
    pub tax_year: i32,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            jurisdiction: "US".to_string(),
            tax_year: 2026,
        }
    }
}

/// Stateless calculator dispatch over a read-only bracket catalog.
///
/// The engine holds no mutable state, so one instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone)]
pub struct CalculationEngine {
    catalog: BracketCatalog,
    defaults: EngineDefaults,
}

impl CalculationEngine {
    pub fn new(
        catalog: BracketCatalog,
        defaults: EngineDefaults,
    ) -> Self {
        Self { catalog, defaults }
    }

    pub fn catalog(&self) -> &BracketCatalog {
        &self.catalog
    }

    pub fn defaults(&self) -> &EngineDefaults {
        &self.defaults
    }

    /// Runs the calculator named by `tool_id` on `inputs`.
    ///
    /// Every field the tool reads is normalized before any arithmetic runs.
    /// Fields the tool does not know are ignored.
    ///
    /// # Errors
    ///
    /// * [`CalculationError::UnknownTool`] when `tool_id` names no calculator.
    /// * [`CalculationError::MissingField`] / [`CalculationError::InvalidField`]
    ///   for absent or malformed input.
    /// * [`CalculationError::NoBracketTable`] when a tax tool has no table for
    ///   the requested jurisdiction, year and filing status.
    pub fn calculate(
        &self,
        tool_id: &str,
        inputs: &RawInputs,
    ) -> Result<CalculationResult, CalculationError> {
        let tool = ToolId::parse(tool_id).ok_or_else(|| CalculationError::UnknownTool(tool_id.to_string()))?;
        self.calculate_tool(tool, inputs)
    }

    pub fn calculate_tool(
        &self,
        tool: ToolId,
        inputs: &RawInputs,
    ) -> Result<CalculationResult, CalculationError> {
        let fields = Fields::new(inputs, &self.defaults);
        debug!(%tool, fields = ?fields.names(), "calculating");

        let result = self.dispatch(tool, &fields);
        if let Err(ref error) = result {
            debug!(%tool, %error, "calculation failed");
        }
        result
    }

    fn dispatch(
        &self,
        tool: ToolId,
        fields: &Fields<'_>,
    ) -> Result<CalculationResult, CalculationError> {
        let result = match tool {
            ToolId::CapitalGains => {
                let input = CapitalGainsInput::from_fields(fields)?;
                CalculationResult::Tax(CapitalGainsCalculator::new(&self.catalog).calculate(&input)?)
            }
            ToolId::IncomeTax => {
                let input = IncomeTaxInput::from_fields(fields)?;
                CalculationResult::Tax(IncomeTaxCalculator::new(&self.catalog).calculate(&input)?)
            }
            ToolId::Bmi => CalculationResult::Formula(bmi::calculate(&bmi::BmiInput::from_fields(fields)?)),
            ToolId::PaintCost => CalculationResult::Formula(paint::calculate(&paint::PaintInput::from_fields(fields)?)),
            ToolId::RentAffordability => {
                CalculationResult::Formula(rent::calculate(&rent::RentInput::from_fields(fields)?))
            }
            ToolId::PropertyTax => CalculationResult::Formula(property_tax::calculate(
                &property_tax::PropertyTaxInput::from_fields(fields)?,
            )),
            ToolId::Ovulation => {
                CalculationResult::Formula(ovulation::calculate(&ovulation::OvulationInput::from_fields(fields)?)?)
            }
            ToolId::PasswordStrength => {
                CalculationResult::Formula(password::calculate(&password::PasswordInput::from_fields(fields)?))
            }
            ToolId::HolidayCountdown => {
                CalculationResult::Formula(countdown::calculate(&countdown::CountdownInput::from_fields(fields)?)?)
            }
            ToolId::UnitConversion => CalculationResult::Formula(unit_conversion::calculate(
                &unit_conversion::ConversionInput::from_fields(fields)?,
            )),
        };
        Ok(result)
    }
}
