use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

/// A judge score that passed validation: finite, within `[1.0, 10.0]`,
/// with at most one fractional digit.
///
/// Outside this crate a `Score` only comes out of
/// [`validate`](crate::scoring::validate::validate) or out of
/// deserialization, which re-checks the range and the digit rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub(crate) fn new_unchecked(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Score {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(format!(
                "score {value} is outside [{MIN_SCORE}, {MAX_SCORE}]"
            ));
        }
        if !has_at_most_one_fraction_digit(value) {
            return Err(format!("score {value} has more than one fractional digit"));
        }
        Ok(Self(value))
    }
}

// Tenths are not exact in binary, so compare against the nearest tenth.
pub(crate) fn has_at_most_one_fraction_digit(value: f64) -> bool {
    let tenths = value * 10.0;
    (tenths - tenths.round()).abs() < 1e-6
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Outcome of one aggregation run over a complete judge panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Every score, sorted ascending.
    pub all_scores: Vec<Score>,
    /// `[min, max]`: the first and last element of `all_scores`.
    pub excluded_scores: [Score; 2],
    pub included_scores: Vec<Score>,
    pub total: f64,
    pub participant_name: String,
}

impl CalculationResult {
    pub fn excluded_min(&self) -> Score {
        self.excluded_scores[0]
    }

    pub fn excluded_max(&self) -> Score {
        self.excluded_scores[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_deserialization_rejects_out_of_range_values() {
        assert!(serde_json::from_str::<Score>("8.5").is_ok());
        assert!(serde_json::from_str::<Score>("0.5").is_err());
        assert!(serde_json::from_str::<Score>("10.1").is_err());
    }

    #[test]
    fn score_deserialization_rejects_second_fraction_digit() {
        assert!(serde_json::from_str::<Score>("8.55").is_err());
        assert!(serde_json::from_str::<Score>("9.1").is_ok());
        assert!(serde_json::from_str::<Score>("7").is_ok());
    }

    #[test]
    fn score_serializes_as_raw_number() {
        let json = serde_json::to_string(&Score::new_unchecked(9.5)).expect("score should serialize");
        assert_eq!(json, "9.5");
    }

    #[test]
    fn score_display_has_one_decimal() {
        assert_eq!(Score::new_unchecked(7.0).to_string(), "7.0");
    }
}
