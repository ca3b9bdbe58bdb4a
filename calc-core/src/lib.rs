pub mod calculations;
pub mod catalog;
pub mod engine;
pub mod models;
pub mod normalize;

#[cfg(test)]
mod test_support;

pub use catalog::BracketCatalog;
pub use engine::{CalculationEngine, CalculationError, EngineDefaults, ToolId};
pub use models::*;
pub use normalize::{NormalizeError, Unit, ValueKind, normalize, normalize_date};
