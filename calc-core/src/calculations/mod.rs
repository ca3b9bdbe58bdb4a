//! Calculators behind the engine, one module per tool, plus the shared
//! bracket resolver and rounding helpers.
//!
//! Each calculator pairs an input struct, built from request fields through
//! [`FromFields`](crate::engine::FromFields), with a pure function (or, for
//! the bracket-based tools, a calculator borrowing the catalog).

pub mod bmi;
pub mod brackets;
pub mod capital_gains;
pub mod category;
pub mod common;
pub mod countdown;
pub mod income_tax;
pub mod ovulation;
pub mod paint;
pub mod password;
pub mod profile;
pub mod property_tax;
pub mod rent;
pub mod unit_conversion;

pub use brackets::{BracketAssessment, BracketResolver};
pub use capital_gains::{CapitalGainsCalculator, CapitalGainsInput};
pub use category::ThresholdBands;
pub use countdown::Holiday;
pub use income_tax::{IncomeTaxCalculator, IncomeTaxInput};
pub use profile::TaxProfile;
