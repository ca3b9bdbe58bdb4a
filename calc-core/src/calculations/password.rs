//! Password strength as brute-force entropy.
//!
//! The search space is the union of the character pools the password draws
//! from; entropy is `length * log2(pool)`. The password itself never leaves
//! this module and is never logged.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::category::ThresholdBands;
use super::common::round_half_up;
use crate::engine::{CalculationError, Fields, FromFields};
use crate::models::{Figure, FigureValue, FormulaOutcome};

const LOWERCASE_POOL: u32 = 26;
const UPPERCASE_POOL: u32 = 26;
const DIGIT_POOL: u32 = 10;
/// Printable ASCII punctuation plus space.
const SYMBOL_POOL: u32 = 33;
/// Rough allowance for anything outside ASCII.
const OTHER_POOL: u32 = 100;

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordInput {
    pub password: String,
}

impl std::fmt::Debug for PasswordInput {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PasswordInput").field("password", &"<redacted>").finish()
    }
}

impl FromFields for PasswordInput {
    fn from_fields(fields: &Fields<'_>) -> Result<Self, CalculationError> {
        Ok(Self {
            password: fields.required_text("password")?,
        })
    }
}

/// Which character classes appear in a password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterClasses {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub other: bool,
}

impl CharacterClasses {
    pub fn of(password: &str) -> Self {
        password.chars().fold(Self::default(), |mut classes, c| {
            match c {
                'a'..='z' => classes.lowercase = true,
                'A'..='Z' => classes.uppercase = true,
                '0'..='9' => classes.digits = true,
                ' ' => classes.symbols = true,
                c if c.is_ascii_punctuation() => classes.symbols = true,
                _ => classes.other = true,
            }
            classes
        })
    }

    pub fn pool_size(&self) -> u32 {
        [
            (self.lowercase, LOWERCASE_POOL),
            (self.uppercase, UPPERCASE_POOL),
            (self.digits, DIGIT_POOL),
            (self.symbols, SYMBOL_POOL),
            (self.other, OTHER_POOL),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum()
    }

    pub fn count(&self) -> i64 {
        [self.lowercase, self.uppercase, self.digits, self.symbols, self.other]
            .iter()
            .filter(|present| **present)
            .count() as i64
    }
}

fn strength() -> ThresholdBands {
    ThresholdBands::new("Very strong")
        .below(dec!(28), "Very weak")
        .below(dec!(36), "Weak")
        .below(dec!(60), "Moderate")
        .below(dec!(128), "Strong")
}

/// Entropy in bits, rounded to two places.
pub fn entropy_bits(password: &str) -> Decimal {
    let length = password.chars().count();
    let pool = CharacterClasses::of(password).pool_size();
    if length == 0 || pool == 0 {
        return Decimal::ZERO;
    }
    let bits_per_char = Decimal::from(pool).ln() / Decimal::TWO.ln();
    round_half_up(Decimal::from(length) * bits_per_char)
}

pub fn calculate(input: &PasswordInput) -> FormulaOutcome {
    let classes = CharacterClasses::of(&input.password);
    let bits = entropy_bits(&input.password);

    FormulaOutcome {
        headline: Figure::quantity("entropy", bits, "bits"),
        category: Some(strength().classify(bits).to_string()),
        figures: vec![
            Figure::count("length", input.password.chars().count() as i64),
            Figure::count("character_classes", classes.count()),
            Figure::count("pool_size", i64::from(classes.pool_size())),
            Figure::new("has_symbols", FigureValue::Text(if classes.symbols { "yes" } else { "no" }.to_string())),
        ],
    }
}
