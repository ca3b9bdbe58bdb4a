//! Threshold-based classification for calculators that label a result
//! (BMI category, password strength).

use rust_decimal::Decimal;

/// Ordered upper limits with a label each. A value falls into the first band
/// whose limit it is strictly below; values at or above every limit get the
/// top label.
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::ThresholdBands;
///
/// let bands = ThresholdBands::new("Obese")
///     .below(dec!(18.5), "Underweight")
///     .below(dec!(25), "Normal weight")
///     .below(dec!(30), "Overweight");
///
/// assert_eq!(bands.classify(dec!(22.86)), "Normal weight");
/// assert_eq!(bands.classify(dec!(25)), "Overweight");
/// assert_eq!(bands.classify(dec!(41)), "Obese");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdBands {
    bands: Vec<(Decimal, &'static str)>,
    top: &'static str,
}

impl ThresholdBands {
    pub fn new(top: &'static str) -> Self {
        Self {
            bands: Vec::new(),
            top,
        }
    }

    /// Adds a band. Limits must be added in ascending order.
    pub fn below(
        mut self,
        limit: Decimal,
        label: &'static str,
    ) -> Self {
        debug_assert!(self.bands.last().is_none_or(|(previous, _)| *previous < limit));
        self.bands.push((limit, label));
        self
    }

    pub fn classify(
        &self,
        value: Decimal,
    ) -> &'static str {
        self.bands
            .iter()
            .find(|(limit, _)| value < *limit)
            .map_or(self.top, |(_, label)| label)
    }
}
