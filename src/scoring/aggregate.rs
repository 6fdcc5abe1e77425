use crate::error::{Result, SlamError};
use crate::panel::{MAX_JUDGES, MIN_JUDGES};
use crate::types::score::{CalculationResult, Score};

/// Sorts the panel, drops one lowest and one highest score by position, and
/// sums the rest in ascending order.
///
/// Pure: the same multiset of scores always yields a bit-identical result.
pub fn aggregate(scores: &[Score], participant_name: &str) -> Result<CalculationResult> {
    if !(MIN_JUDGES..=MAX_JUDGES).contains(&scores.len()) {
        return Err(SlamError::PanelSize {
            actual: scores.len(),
            min: MIN_JUDGES,
            max: MAX_JUDGES,
        });
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(Score::total_cmp);

    let last = sorted.len() - 1;
    let excluded_scores = [sorted[0], sorted[last]];
    let included_scores = sorted[1..last].to_vec();
    let total = included_scores
        .iter()
        .fold(0.0_f64, |sum, score| sum + score.value());

    tracing::debug!(
        judges = sorted.len(),
        min = excluded_scores[0].value(),
        max = excluded_scores[1].value(),
        total,
        "aggregated panel"
    );

    Ok(CalculationResult {
        all_scores: sorted,
        excluded_scores,
        included_scores,
        total,
        participant_name: participant_name.to_string(),
    })
}
