use std::{fmt::Display, str::FromStr};

use derive_getters::Getters;
use jiff::Zoned;

use super::{InventoryError, PreCode, SequenceNumber};

/// Human readable asset tag, rendered as `PRECODE-YYYY-MM-N`.
///
/// Year and month label when the tag was purchased. The sequence number keeps
/// counting across months and years.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct Tag {
    pre_code: PreCode,
    year: i16,
    month: i8,
    #[getter(skip)]
    sequence: SequenceNumber,
}

impl Tag {
    pub fn new(
        pre_code: PreCode,
        year: i16,
        month: i8,
        sequence: SequenceNumber,
    ) -> Result<Self, InventoryError> {
        if !(0..=9999).contains(&year) {
            return Err(InventoryError::UnstampableYear(year));
        }
        debug_assert!((1..=12).contains(&month), "month should be a calendar month");
        Ok(Self {
            pre_code,
            year,
            month,
            sequence,
        })
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Stamps a tag with the civil year and month of the purchase, in the
    /// purchase's own time zone.
    pub fn stamped(
        pre_code: &PreCode,
        purchased_at: &Zoned,
        sequence: SequenceNumber,
    ) -> Result<Self, InventoryError> {
        Self::new(
            pre_code.clone(),
            purchased_at.year(),
            purchased_at.month(),
            sequence,
        )
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{:04}-{:02}-{}",
            self.pre_code, self.year, self.month, self.sequence
        )
    }
}

fn digits(part: &str, len: Option<usize>) -> bool {
    !part.is_empty()
        && len.is_none_or(|len| part.len() == len)
        && part.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Tag {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InventoryError::MalformedTag(s.to_string());

        let mut parts = s.split('-');
        let (Some(pre_code), Some(year), Some(month), Some(sequence), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(malformed());
        };
        if !(digits(year, Some(4)) && digits(month, Some(2)) && digits(sequence, None)) {
            return Err(malformed());
        }

        let pre_code: PreCode = pre_code.parse().map_err(|_| malformed())?;
        let year: i16 = year.parse().map_err(|_| malformed())?;
        let month: i8 = month.parse().map_err(|_| malformed())?;
        if !(1..=12).contains(&month) {
            return Err(malformed());
        }
        let sequence = sequence
            .parse::<u64>()
            .ok()
            .and_then(|sequence| SequenceNumber::try_from(sequence).ok())
            .ok_or_else(malformed)?;

        Self::new(pre_code, year, month, sequence)
    }
}

/// Extracts the sequence suffix of a historical tag string of a category.
///
/// Returns `None` when the string does not start with `{pre_code}-` or when
/// the part after its last `-` is not a non-negative integer up to
/// [`SequenceNumber::MAX`].
pub fn sequence_suffix(pre_code: &PreCode, raw: &str) -> Option<u64> {
    raw.strip_prefix(pre_code.as_str())?.strip_prefix('-')?;
    let (_, suffix) = raw.rsplit_once('-')?;
    if !digits(suffix, None) {
        return None;
    }
    suffix
        .parse::<u64>()
        .ok()
        .filter(|suffix| *suffix <= SequenceNumber::MAX.get())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use jiff::{
        civil::date,
        tz::{TimeZone, offset},
    };
    use rstest::*;

    use super::*;

    #[fixture]
    fn lap() -> PreCode {
        assert_ok!("LAP".parse::<PreCode>())
    }

    fn sequence(value: u64) -> SequenceNumber {
        assert_ok!(SequenceNumber::try_from(value))
    }

    #[rstest]
    fn test_tag_renders_padded_month_and_unpadded_sequence(lap: PreCode) {
        let tag = assert_ok!(Tag::new(lap, 2024, 3, sequence(17)));
        assert_eq!("LAP-2024-03-17", tag.to_string());
    }

    #[rstest]
    fn test_stamped_uses_civil_month_of_purchase_zone(lap: PreCode) {
        // 23:30 on the last day of February in UTC is already March at +09:00
        let utc = assert_ok!(date(2024, 2, 29).at(23, 30, 0, 0).to_zoned(TimeZone::UTC));
        let tokyo = utc.with_time_zone(TimeZone::fixed(offset(9)));

        let in_utc = assert_ok!(Tag::stamped(&lap, &utc, sequence(4)));
        let in_tokyo = assert_ok!(Tag::stamped(&lap, &tokyo, sequence(4)));

        assert_eq!("LAP-2024-02-4", in_utc.to_string());
        assert_eq!("LAP-2024-03-4", in_tokyo.to_string());
    }

    #[rstest]
    fn test_negative_years_are_unstampable(lap: PreCode) {
        assert_eq!(
            Err(InventoryError::UnstampableYear(-1)),
            Tag::new(lap, -1, 1, sequence(1))
        );
    }

    #[rstest]
    #[case("LAP-2024-03-17", 17)]
    #[case("L-1999-12-1", 1)]
    #[case("SCAN-2025-01-123456", 123_456)]
    fn test_tag_parses(#[case] raw: &str, #[case] expected: u64) {
        let tag = assert_ok!(raw.parse::<Tag>());
        assert_eq!(expected, tag.sequence().get());
        assert_eq!(raw, tag.to_string());
    }

    #[rstest]
    #[case("lap-2024-03-17")]
    #[case("LAPTO-2024-03-17")]
    #[case("LAP-24-03-17")]
    #[case("LAP-2024-3-17")]
    #[case("LAP-2024-13-17")]
    #[case("LAP-2024-00-17")]
    #[case("LAP-2024-03-")]
    #[case("LAP-2024-03-0")]
    #[case("LAP-2024-03-+7")]
    #[case("LAP-2024-03-17-2")]
    #[case("LAP202403")]
    fn test_malformed_tags_are_rejected(#[case] raw: &str) {
        assert_eq!(
            Err(InventoryError::MalformedTag(raw.to_string())),
            raw.parse::<Tag>()
        );
    }

    #[rstest]
    #[case("LAP-2024-01-1", Some(1))]
    #[case("LAP-2024-02-0", Some(0))]
    #[case("LAP-2024-02-0042", Some(42))]
    #[case("LAP-7", Some(7))]
    #[case("LAPT-2024-01-9", None)]
    #[case("LA-2024-01-9", None)]
    #[case("MOB-2024-01-9", None)]
    #[case("LAP-2024-01-x", None)]
    #[case("LAP-2024-01-", None)]
    #[case("LAP-2024-01-99999999999999999999999", None)]
    #[case("LAP-2024-01-9223372036854775807", Some(9_223_372_036_854_775_807))]
    #[case("LAP-2024-01-9223372036854775808", None)]
    #[case("LAP-2024-01-18446744073709551615", None)]
    #[case("LAP", None)]
    fn test_sequence_suffix(lap: PreCode, #[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(expected, sequence_suffix(&lap, raw));
    }
}
