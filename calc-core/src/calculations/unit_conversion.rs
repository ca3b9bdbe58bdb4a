//! Conversion between units of the same kind (mass, length or area).

use rust_decimal::Decimal;

use super::common::round_to;
use crate::engine::{CalculationError, Fields, FromFields, invalid};
use crate::models::{Figure, FormulaOutcome, RawValue};
use crate::normalize::{NormalizeError, Unit, ValueKind, normalize};

const RESULT_DP: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInput {
    /// The value in the canonical unit of `to`'s kind.
    pub canonical: Decimal,
    pub to: Unit,
}

/// `value` may carry its own unit (`"5 ft"`); otherwise the optional `from`
/// field names it, and a bare number is read in the canonical unit.
impl FromFields for ConversionInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        let to = fields
            .choice("to", Unit::parse)?
            .ok_or(CalculationError::MissingField("to"))?;
        let from = fields.choice("from", Unit::parse)?;
        let kind = to.kind();

        if let Some(from) = from {
            if from.kind() != kind {
                let source = NormalizeError::invalid_format(kind, from.symbol());
                return Err(invalid("from", source));
            }
        }

        let raw = fields.raw("value").ok_or(CalculationError::MissingField("value"))?;
        let raw = match from {
            Some(unit) => RawValue::Text(format!("{} {}", raw.as_text().trim(), unit.symbol())),
            None => raw.clone(),
        };
        let canonical = normalize(&raw, kind).map_err(|source| invalid("value", source))?;

        Ok(Self { canonical, to })
    }
}

pub fn calculate(input: &ConversionInput) -> FormulaOutcome {
    let converted = round_to(input.to.from_canonical(input.canonical), RESULT_DP);
    let kind = input.to.kind();

    let mut figures = Vec::new();
    if let Some(canonical_unit) = kind.canonical_unit() {
        figures.push(Figure::quantity(
            "canonical",
            round_to(input.canonical, RESULT_DP),
            canonical_unit.symbol(),
        ));
    }

    FormulaOutcome {
        headline: Figure::quantity("converted", converted, input.to.symbol()),
        category: Some(kind.label().to_string()),
        figures,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::engine::EngineDefaults;
    use crate::models::FigureValue;
    use crate::test_support::inputs;

    fn convert(pairs: &[(&str, &str)]) -> Result<FigureValue, CalculationError> {
        let raw = inputs(pairs);
        let defaults = EngineDefaults::default();
        let input = ConversionInput::from_fields(&Fields::new(&raw, &defaults))?;
        Ok(calculate(&input).headline.value)
    }

    fn quantity(
        value: Decimal,
        unit: &str,
    ) -> FigureValue {
        FigureValue::Quantity {
            value,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn pounds_to_kilograms() {
        assert_eq!(convert(&[("value", "150 lb"), ("to", "kg")]), Ok(quantity(dec!(68.0389), "kg")));
    }

    #[test]
    fn feet_and_inches_to_centimetres() {
        assert_eq!(convert(&[("value", "5'10\""), ("to", "cm")]), Ok(quantity(dec!(177.8), "cm")));
    }

    #[test]
    fn from_field_supplies_the_unit() {
        assert_eq!(
            convert(&[("value", "2"), ("from", "mi"), ("to", "km")]),
            Ok(quantity(dec!(3.2187), "km"))
        );
    }

    #[test]
    fn square_metres_to_square_feet() {
        assert_eq!(convert(&[("value", "1 sqm"), ("to", "sqft")]), Ok(quantity(dec!(10.7639), "sqft")));
    }

    #[test]
    fn mismatched_kinds_are_rejected() {
        let err = convert(&[("value", "5 kg"), ("to", "ft")]).unwrap_err();

        assert_eq!(err.field(), Some("value"));

        let err = convert(&[("value", "5"), ("from", "kg"), ("to", "ft")]).unwrap_err();

        assert_eq!(err.field(), Some("from"));
    }

    #[test]
    fn unknown_target_unit() {
        let err = convert(&[("value", "5"), ("to", "furlong")]).unwrap_err();

        assert_eq!(err.field(), Some("to"));
    }

    #[test]
    fn value_too_large_to_convert_is_out_of_range() {
        let err = convert(&[("value", "79228162514264337593543950335 km"), ("to", "m")]).unwrap_err();

        assert_eq!(err.field(), Some("value"));
        assert!(matches!(err.normalize_error(), Some(NormalizeError::OutOfRange { .. })));

        let err = convert(&[("value", "79228162514264337593543950335"), ("from", "mi"), ("to", "m")]).unwrap_err();

        assert!(matches!(err.normalize_error(), Some(NormalizeError::OutOfRange { .. })));
    }
}
