//! Decimal-separator handling for raw judge input.
//!
//! Both `,` and `.` are accepted as the decimal point. When the two kinds
//! are mixed, the rightmost kind wins and every occurrence of the other kind
//! is deleted outright, so `"8,5.2"` becomes `"85.2"`, not `"8.52"`. That
//! tie-break is kept exactly as users of earlier exports know it, even
//! though it turns plausible input into out-of-range values.

const COMMA: char = ',';
const DOT: char = '.';

/// Collapses decimal separators to at most one `.`.
///
/// 1. A separator kind that occurs more than once keeps only its first
///    occurrence.
/// 2. If both kinds remain, the kind whose last occurrence is rightmost in
///    the original text wins; the other kind is removed entirely.
/// 3. A surviving comma becomes a period.
pub fn normalize_separators(text: &str) -> String {
    let last_comma = text.rfind(COMMA);
    let last_dot = text.rfind(DOT);

    let mut reduced = keep_first_occurrence(text, COMMA);
    reduced = keep_first_occurrence(&reduced, DOT);

    if let (Some(comma_at), Some(dot_at)) = (last_comma, last_dot) {
        let loser = if dot_at > comma_at { COMMA } else { DOT };
        reduced.retain(|c| c != loser);
    }

    reduced.replace(COMMA, ".")
}

/// Truncates (never rounds) the fractional part to a single character.
/// Expects text already passed through [`normalize_separators`].
pub fn limit_to_one_fraction_digit(text: &str) -> String {
    match text.split_once(DOT) {
        Some((whole, fraction)) if fraction.chars().count() > 1 => {
            let first: String = fraction.chars().take(1).collect();
            format!("{whole}.{first}")
        }
        _ => text.to_string(),
    }
}

/// Canonical form written back into a field when the user leaves it.
pub fn canonicalize(text: &str) -> String {
    limit_to_one_fraction_digit(&normalize_separators(text.trim()))
}

/// Number of characters after the decimal point of normalized text.
pub(crate) fn fraction_len(normalized: &str) -> usize {
    normalized
        .split_once(DOT)
        .map_or(0, |(_, fraction)| fraction.chars().count())
}

fn keep_first_occurrence(text: &str, separator: char) -> String {
    let mut seen = false;
    text.chars()
        .filter(|&c| {
            if c != separator {
                return true;
            }
            if seen {
                false
            } else {
                seen = true;
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn comma_becomes_period() {
        assert_eq!(normalize_separators("8,5"), "8.5");
    }

    #[test]
    fn period_is_left_alone() {
        assert_eq!(normalize_separators("9.2"), "9.2");
    }

    #[test]
    fn repeated_separator_keeps_first_occurrence() {
        assert_eq!(normalize_separators("8..5"), "8.5");
        assert_eq!(normalize_separators("1,2,3"), "1.23");
    }

    #[test]
    fn mixed_separators_delete_the_losing_kind() {
        assert_eq!(normalize_separators("8,5.2"), "85.2");
        assert_eq!(normalize_separators("8.5,2"), "85.2");
    }

    #[test]
    fn mixed_separators_use_rightmost_position_before_reduction() {
        // Dots reduce to the first one, but the comma is rightmost overall.
        assert_eq!(normalize_separators("1.2.3,4"), "123.4");
        // The second comma sits right of the dot, so commas win.
        assert_eq!(normalize_separators("1,2.3,4"), "1.234");
    }

    #[test]
    fn truncates_instead_of_rounding() {
        assert_eq!(limit_to_one_fraction_digit("8.59"), "8.5");
        assert_eq!(limit_to_one_fraction_digit("8.5"), "8.5");
        assert_eq!(limit_to_one_fraction_digit("8"), "8");
    }

    #[test]
    fn canonicalize_handles_locale_input() {
        assert_eq!(canonicalize("8,55"), "8.5");
        assert_eq!(canonicalize(" 9,0 "), "9.0");
    }

    #[test]
    fn fraction_len_counts_after_point() {
        assert_eq!(fraction_len("8.55"), 2);
        assert_eq!(fraction_len("8"), 0);
        assert_eq!(fraction_len("8."), 0);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(text in "[0-9,. a-z]{0,12}") {
            let once = normalize_separators(&text);
            prop_assert_eq!(normalize_separators(&once), once);
        }

        #[test]
        fn normalized_text_has_at_most_one_period_and_no_comma(text in "[0-9,.]{0,12}") {
            let normalized = normalize_separators(&text);
            prop_assert!(!normalized.contains(','));
            prop_assert!(normalized.matches('.').count() <= 1);
        }

        #[test]
        fn canonicalize_is_idempotent(text in "[0-9,.]{0,12}") {
            let once = canonicalize(&text);
            prop_assert_eq!(canonicalize(&once), once);
        }
    }
}
