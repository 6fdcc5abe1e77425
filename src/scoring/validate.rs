use crate::scoring::normalize::{fraction_len, normalize_separators};
use crate::types::score::{has_at_most_one_fraction_digit, Score, MAX_SCORE, MIN_SCORE};
use thiserror::Error;

/// Why a single field's text is not a usable score.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("enter a score")]
    Empty,

    #[error("use at most one digit after the decimal point")]
    TooManyFractionDigits,

    #[error("score must be between 1.0 and 10.0")]
    OutOfRange,
}

/// Checks raw field text without rewriting it, so it can run on every
/// keystroke. Text that does not parse as a number counts as non-finite.
pub fn validate(text: &str) -> Result<Score, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let normalized = normalize_separators(trimmed);
    if fraction_len(&normalized) > 1 {
        return Err(ValidationError::TooManyFractionDigits);
    }

    let value = normalized.parse::<f64>().unwrap_or(f64::NAN);
    if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(ValidationError::OutOfRange);
    }
    // Exponent notation can carry extra precision without a decimal point.
    if !has_at_most_one_fraction_digit(value) {
        return Err(ValidationError::TooManyFractionDigits);
    }

    Ok(Score::new_unchecked(value))
}
