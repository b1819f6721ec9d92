//! Change-unit name parsing and ordering.
//!
//! A unit name is `DATE(-SEQ)?-REST` where `DATE` is exactly 8 digits and
//! `SEQ`, when present, is 1 to 3 digits. An `activate-` marker anywhere in
//! `REST` makes the unit Activation-kind; everything after the marker is the
//! target component identifier. Names lacking this shape are invalid and
//! excluded from the run (reported, not fatal).
use std::cmp::Ordering;

use crate::error::MigrateError;

/// Marker that flags a unit as Activation-kind.
const ACTIVATE_MARKER: &str = "activate-";

/// Classification of a change-unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Turns on an installed component; carries the target identifier.
    Activation {
        /// Component identifier after the `activate-` marker.
        target: String,
    },
    /// Raw statements executed against the data store.
    DataSql,
}

/// A parsed, orderable change-unit name.
///
/// Ordering is `(date, sequence, raw name)` with an absent sequence sorting
/// before any numbered sequence on the same date. Phase separation
/// (activations before data units) is the engine's job; the comparator only
/// orders within a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitName {
    raw: String,
    date: u32,
    sequence: Option<u16>,
    kind: UnitKind,
}

impl UnitName {
    /// Parse a raw unit name.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::InvalidName`] if the name does not match the
    /// naming convention. The caller must skip the unit and warn rather
    /// than abort.
    pub fn parse(raw: &str) -> Result<Self, MigrateError> {
        let invalid = || MigrateError::InvalidName(raw.to_string());

        let (date_str, rest) = raw.split_at_checked(8).ok_or_else(invalid)?;
        if !date_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let date: u32 = date_str.parse().map_err(|_| invalid())?;
        let rest = rest.strip_prefix('-').ok_or_else(invalid)?;

        // Optional 1-3 digit sequence. Taken only when the digits are
        // followed by '-' and a non-empty remainder; otherwise the digits
        // belong to the remainder itself (e.g. `20250101-12-` has no
        // sequence but a remainder of `12-`).
        let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (sequence, remainder) = if (1..=3).contains(&digit_len)
            && let Some(digits) = rest.get(..digit_len)
            && let Some(tail) = rest.get(digit_len..).and_then(|s| s.strip_prefix('-'))
            && !tail.is_empty()
        {
            let seq: u16 = digits.parse().map_err(|_| invalid())?;
            (Some(seq), tail)
        } else {
            (None, rest)
        };

        if remainder.is_empty() {
            return Err(invalid());
        }

        let kind = remainder.find(ACTIVATE_MARKER).map_or(UnitKind::DataSql, |idx| {
            let target = remainder
                .get(idx + ACTIVATE_MARKER.len()..)
                .unwrap_or_default()
                .to_string();
            UnitKind::Activation { target }
        });

        Ok(Self {
            raw: raw.to_string(),
            date,
            sequence,
            kind,
        })
    }

    /// The original unit name.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The 8-digit calendar day, as a number.
    #[must_use]
    pub const fn date(&self) -> u32 {
        self.date
    }

    /// The optional sequence number (1-3 digits in the name).
    #[must_use]
    pub const fn sequence(&self) -> Option<u16> {
        self.sequence
    }

    /// The unit's classification.
    #[must_use]
    pub const fn kind(&self) -> &UnitKind {
        &self.kind
    }

    /// Whether this unit belongs to the activation phase.
    #[must_use]
    pub const fn is_activation(&self) -> bool {
        matches!(self.kind, UnitKind::Activation { .. })
    }

    fn sort_key(&self) -> (u32, Option<u16>, &str) {
        (self.date, self.sequence, self.raw.as_str())
    }
}

impl Ord for UnitName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for UnitName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> UnitName {
        UnitName::parse(raw).expect("name should parse")
    }

    #[test]
    fn parses_data_unit_with_sequence() {
        let name = parse("20250601-001-seed-data.sql");
        assert_eq!(name.date(), 20_250_601);
        assert_eq!(name.sequence(), Some(1));
        assert_eq!(*name.kind(), UnitKind::DataSql);
        assert_eq!(name.raw(), "20250601-001-seed-data.sql");
    }

    #[test]
    fn parses_data_unit_without_sequence() {
        let name = parse("20250601-seed-data.sql");
        assert_eq!(name.sequence(), None);
        assert_eq!(*name.kind(), UnitKind::DataSql);
    }

    #[test]
    fn parses_activation_unit() {
        let name = parse("20250601-activate-widgets");
        assert!(name.is_activation());
        assert_eq!(
            *name.kind(),
            UnitKind::Activation {
                target: "widgets".to_string()
            }
        );
    }

    #[test]
    fn marker_is_found_anywhere_after_prefix() {
        let name = parse("20250601-002-activate-gallery-pro");
        assert_eq!(name.sequence(), Some(2));
        assert_eq!(
            *name.kind(),
            UnitKind::Activation {
                target: "gallery-pro".to_string()
            }
        );
    }

    #[test]
    fn same_input_always_yields_same_classification() {
        let a = parse("20250601-001-seed.sql");
        let b = parse("20250601-001-seed.sql");
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_short_date() {
        assert!(UnitName::parse("2025061-x.sql").is_err());
    }

    #[test]
    fn rejects_non_digit_date() {
        assert!(UnitName::parse("abc-migration.sql").is_err());
        assert!(UnitName::parse("2025a601-x.sql").is_err());
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(UnitName::parse("20250601x.sql").is_err());
        assert!(UnitName::parse("20250601").is_err());
    }

    #[test]
    fn rejects_empty_remainder() {
        assert!(UnitName::parse("20250601-").is_err());
    }

    #[test]
    fn four_digit_run_is_part_of_the_remainder() {
        let name = parse("20250601-1234-x");
        assert_eq!(name.sequence(), None, "1234 is not a 1-3 digit sequence");
    }

    #[test]
    fn digits_without_following_content_are_the_remainder() {
        let name = parse("20250601-12-");
        assert_eq!(name.sequence(), None);
        assert_eq!(*name.kind(), UnitKind::DataSql);
    }

    #[test]
    fn dates_order_chronologically() {
        assert!(parse("20250101-a.sql") < parse("20250102-a.sql"));
    }

    #[test]
    fn absent_sequence_sorts_before_numbered() {
        let plain = parse("20250601-seed.sql");
        let one = parse("20250601-001-seed.sql");
        let two = parse("20250601-002-seed.sql");
        assert!(plain < one);
        assert!(one < two);
    }

    #[test]
    fn same_key_falls_back_to_name_order() {
        let a = parse("20250601-001-alpha.sql");
        let b = parse("20250601-001-beta.sql");
        assert!(a < b);
    }

    #[test]
    fn sequence_is_numeric_not_lexicographic() {
        assert!(parse("20250601-2-a.sql") < parse("20250601-010-a.sql"));
    }
}
