//! Sequence state derived from tag history.
//!
//! There is no stored counter. The next sequence number of a category is
//! recomputed from every tag ever issued for it, so deleting lots or assets
//! can never make a number come around again.

use std::collections::HashSet;

use jiff::Zoned;
use log::warn;

use crate::inventory::{PreCode, Quantity, SequenceNumber, Tag, sequence_suffix};

use super::SequencerError;

/// Sequence number following everything in `history`, or the first sequence
/// number for an empty history.
///
/// Each entry counts with the larger of its stored sequence number and the
/// suffix of its tag. Tags that do not belong to `pre_code` or carry no
/// numeric suffix are skipped, but their stored number stays taken.
pub fn next_sequence_number<S: AsRef<str>>(
    pre_code: &PreCode,
    history: impl IntoIterator<Item = (SequenceNumber, S)>,
) -> Result<SequenceNumber, SequencerError> {
    let highest = history
        .into_iter()
        .map(|(stored, raw)| {
            let raw = raw.as_ref();
            if let Some(suffix) = sequence_suffix(pre_code, raw) {
                suffix.max(stored.get())
            } else {
                warn!("ignoring corrupt tag {raw:?} in history of {pre_code}, keeping number {stored}");
                u64::from(stored)
            }
        })
        .max()
        .unwrap_or(0);

    SequenceNumber::after(highest).ok_or_else(|| SequencerError::SequenceExhausted(pre_code.clone()))
}

/// Formats `quantity` contiguous tags starting at `start`, stamped with the
/// purchase month.
pub fn format_tags(
    pre_code: &PreCode,
    start: SequenceNumber,
    quantity: Quantity,
    purchased_at: &Zoned,
) -> Result<Vec<Tag>, SequencerError> {
    (0..u64::from(quantity.get()))
        .map(|offset| -> Result<Tag, SequencerError> {
            let sequence = start
                .checked_add(offset)
                .ok_or_else(|| SequencerError::SequenceExhausted(pre_code.clone()))?;
            Ok(Tag::stamped(pre_code, purchased_at, sequence)?)
        })
        .collect()
}

/// Lowest-sequence issued tag that no registered asset carries yet.
pub fn first_available<I: AsRef<str>, C: AsRef<str>>(
    pre_code: &PreCode,
    issued: impl IntoIterator<Item = I>,
    consumed: impl IntoIterator<Item = C>,
) -> Option<Tag> {
    let consumed: HashSet<String> = consumed
        .into_iter()
        .map(|tag| tag.as_ref().to_ascii_uppercase())
        .collect();

    issued
        .into_iter()
        .filter(|raw| !consumed.contains(&raw.as_ref().to_ascii_uppercase()))
        .filter_map(|raw| {
            let raw = raw.as_ref();
            match raw.parse::<Tag>() {
                Ok(tag) if tag.pre_code() == pre_code => Some(tag),
                _ => {
                    warn!("ignoring corrupt issued tag {raw:?} of {pre_code}");
                    None
                }
            }
        })
        .min_by_key(Tag::sequence)
}

pub fn contains_ignore_case<S: AsRef<str>>(
    registered: impl IntoIterator<Item = S>,
    candidate: &str,
) -> bool {
    registered
        .into_iter()
        .any(|tag| tag.as_ref().eq_ignore_ascii_case(candidate))
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::testing::{pre_code, purchased_at, quantity};

    #[fixture]
    fn lap() -> PreCode {
        pre_code("LAP")
    }

    fn rendered(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(ToString::to_string).collect()
    }

    fn history<'a>(rows: &[(u64, &'a str)]) -> Vec<(SequenceNumber, &'a str)> {
        rows.iter()
            .map(|(sequence, tag)| (assert_ok!(SequenceNumber::try_from(*sequence)), *tag))
            .collect()
    }

    #[rstest]
    fn test_empty_history_starts_at_one(lap: PreCode) {
        let next = assert_ok!(next_sequence_number(&lap, Vec::<(SequenceNumber, String)>::new()));
        assert_eq!(SequenceNumber::FIRST, next);
    }

    #[rstest]
    fn test_next_follows_highest_suffix_across_months(lap: PreCode) {
        let history = history(&[
            (1, "LAP-2024-01-1"),
            (2, "LAP-2024-01-2"),
            (3, "LAP-2024-02-3"),
        ]);
        let next = assert_ok!(next_sequence_number(&lap, history));
        assert_eq!(4, next.get());
    }

    #[rstest]
    fn test_next_ignores_gaps_and_order(lap: PreCode) {
        let history = history(&[
            (12, "LAP-2025-06-12"),
            (3, "LAP-2023-01-3"),
            (7, "LAP-2024-11-7"),
        ]);
        let next = assert_ok!(next_sequence_number(&lap, history));
        assert_eq!(13, next.get());
    }

    #[rstest]
    fn test_corrupt_and_foreign_tags_are_skipped(lap: PreCode) {
        let history = history(&[
            (5, "LAP-2024-01-5"),
            (1, "LAP-2024-01-garbage"),
            (2, "MOB-2024-01-99"),
            (3, "LAPT-2024-01-77"),
            (4, ""),
        ]);
        let next = assert_ok!(next_sequence_number(&lap, history));
        assert_eq!(6, next.get());
    }

    #[rstest]
    fn test_corrupt_tag_keeps_its_stored_number(lap: PreCode) {
        let history = history(&[
            (1, "LAP-2024-01-1"),
            (2, "LAP-2024-01-2"),
            (3, "LAP-2024-01-??"),
        ]);
        let next = assert_ok!(next_sequence_number(&lap, history));
        assert_eq!(4, next.get());
    }

    #[rstest]
    fn test_suffix_above_stored_number_wins(lap: PreCode) {
        let next = assert_ok!(next_sequence_number(&lap, history(&[(1, "LAP-2024-01-40")])));
        assert_eq!(41, next.get());
    }

    #[rstest]
    fn test_exhausted_sequence_is_reported(lap: PreCode) {
        let tag = format!("LAP-2024-01-{}", SequenceNumber::MAX);
        let result = next_sequence_number(&lap, [(SequenceNumber::FIRST, tag)]);
        assert!(matches!(result, Err(SequencerError::SequenceExhausted(code)) if code == lap));
    }

    #[rstest]
    fn test_exhausted_by_stored_number_of_corrupt_tag(lap: PreCode) {
        let result = next_sequence_number(&lap, [(SequenceNumber::MAX, "LAP-2024-01-x")]);
        assert!(matches!(result, Err(SequencerError::SequenceExhausted(_))));
    }

    #[rstest]
    fn test_format_tags_is_contiguous_and_stamped(lap: PreCode) {
        let start = assert_ok!(SequenceNumber::try_from(4u64));
        let tags = assert_ok!(format_tags(
            &lap,
            start,
            quantity(2),
            &purchased_at(2024, 3, 15)
        ));
        assert_eq!(vec!["LAP-2024-03-4", "LAP-2024-03-5"], rendered(&tags));
    }

    #[rstest]
    fn test_format_tags_stops_at_sequence_end(lap: PreCode) {
        let result = format_tags(
            &lap,
            SequenceNumber::MAX,
            quantity(2),
            &purchased_at(2024, 3, 15),
        );
        assert!(matches!(result, Err(SequencerError::SequenceExhausted(_))));
    }

    #[rstest]
    fn test_first_available_skips_consumed(lap: PreCode) {
        let issued = ["LAP-2024-01-1", "LAP-2024-01-2"];
        let consumed = ["LAP-2024-01-1"];
        let next = assert_some!(first_available(&lap, issued, consumed));
        assert_eq!("LAP-2024-01-2", next.to_string());
    }

    #[rstest]
    fn test_first_available_backfills_lowest_sequence(lap: PreCode) {
        let issued = ["LAP-2024-01-3", "LAP-2024-01-1", "LAP-2024-01-2", "LAP-2024-02-4"];
        let consumed = ["LAP-2024-02-4", "LAP-2024-01-3", "LAP-2024-01-2"];
        let next = assert_some!(first_available(&lap, issued, consumed));
        assert_eq!("LAP-2024-01-1", next.to_string());
    }

    #[rstest]
    fn test_first_available_matches_consumed_ignoring_case(lap: PreCode) {
        let issued = ["LAP-2024-01-1", "LAP-2024-01-2"];
        let consumed = ["lap-2024-01-1"];
        let next = assert_some!(first_available(&lap, issued, consumed));
        assert_eq!(2, next.sequence().get());
    }

    #[rstest]
    #[case(&[], &[])]
    #[case(&["LAP-2024-01-1"], &["LAP-2024-01-1"])]
    #[case(&["LAP-2024-01-x", "MOB-2024-01-1"], &[])]
    fn test_nothing_available(lap: PreCode, #[case] issued: &[&str], #[case] consumed: &[&str]) {
        assert_none!(first_available(&lap, issued, consumed));
    }

    #[rstest]
    #[case("LAP-2024-03-17", true)]
    #[case("lap-2024-03-17", true)]
    #[case("Lap-2024-03-17", true)]
    #[case("LAP-2024-03-18", false)]
    #[case("LAP-2024-03-17 ", false)]
    fn test_contains_ignore_case(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(
            expected,
            contains_ignore_case(["LAP-2024-03-17"], candidate)
        );
    }
}
