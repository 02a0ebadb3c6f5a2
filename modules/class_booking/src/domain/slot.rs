//! Slot validation and the canonical slot key.
//!
//! The key is a total, collision-free encoding of the (professor,
//! day-of-week, start, end) tuple. Two semantically equal inputs always
//! produce the same key, so keys are safe for set membership and dedup.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::contract::model::Slot;
use crate::domain::error::DomainError;

pub const MINUTES_PER_DAY: u16 = 1440;

impl Slot {
    /// Validating constructor. Out-of-range input fails fast instead of
    /// being coerced.
    pub fn new(day_of_week: u8, start_min: u16, end_min: u16) -> Result<Self, DomainError> {
        let slot = Self {
            day_of_week,
            start_min,
            end_min,
        };
        slot.validate()?;
        Ok(slot)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.day_of_week > 6 {
            return Err(DomainError::validation(
                "day_of_week",
                format!("must be 0..=6, got {}", self.day_of_week),
            ));
        }
        if self.start_min >= MINUTES_PER_DAY {
            return Err(DomainError::validation(
                "start_min",
                format!("must be 0..=1439, got {}", self.start_min),
            ));
        }
        if self.end_min > MINUTES_PER_DAY {
            return Err(DomainError::validation(
                "end_min",
                format!("must be 1..=1440, got {}", self.end_min),
            ));
        }
        if self.start_min >= self.end_min {
            return Err(DomainError::validation(
                "end_min",
                format!("must be after start_min ({} >= {})", self.start_min, self.end_min),
            ));
        }
        Ok(())
    }
}

/// A slot scoped to a professor, the unit of capacity accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub professor: Uuid,
    pub slot: Slot,
}

impl SlotKey {
    pub fn new(professor: Uuid, slot: Slot) -> Result<Self, DomainError> {
        slot.validate()?;
        Ok(Self { professor, slot })
    }
}

/// Canonical encoding: `professor:dow:start-end`. Field order is fixed, so
/// the string form is stable regardless of how the input was assembled.
impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}",
            self.professor, self.slot.day_of_week, self.slot.start_min, self.slot.end_min
        )
    }
}

impl FromStr for SlotKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::validation("slot_key", format!("malformed key '{s}'"));
        let mut parts = s.splitn(3, ':');
        let professor = parts
            .next()
            .and_then(|p| Uuid::parse_str(p).ok())
            .ok_or_else(malformed)?;
        let day_of_week: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let span = parts.next().ok_or_else(malformed)?;
        let (start, end) = span.split_once('-').ok_or_else(malformed)?;
        let start_min: u16 = start.parse().map_err(|_| malformed())?;
        let end_min: u16 = end.parse().map_err(|_| malformed())?;
        Ok(Self {
            professor,
            slot: Slot::new(day_of_week, start_min, end_min)?,
        })
    }
}

/// Canonical per-professor key for a bare slot, used for the ad-hoc class
/// uniqueness column.
pub fn slot_key_string(professor: Uuid, slot: &Slot) -> String {
    SlotKey {
        professor,
        slot: *slot,
    }
    .to_string()
}

/// Structural membership test against a slot set.
pub fn contains_slot(slots: &[Slot], candidate: &Slot) -> bool {
    slots.iter().any(|s| s == candidate)
}

/// Validate a chosen-slot list: 1..=2 entries, each well-formed, no dupes.
pub fn validate_chosen_slots(slots: &[Slot]) -> Result<(), DomainError> {
    if slots.is_empty() || slots.len() > 2 {
        return Err(DomainError::validation(
            "chosen_slots",
            format!("must contain 1..=2 slots, got {}", slots.len()),
        ));
    }
    for slot in slots {
        slot.validate()?;
    }
    let unique: BTreeSet<&Slot> = slots.iter().collect();
    if unique.len() != slots.len() {
        return Err(DomainError::validation(
            "chosen_slots",
            "duplicate slot in chosen slots",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(dow: u8, start: u16, end: u16) -> Slot {
        Slot::new(dow, start, end).unwrap()
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(Slot::new(7, 0, 60).is_err());
        assert!(Slot::new(0, 1440, 1441).is_err());
        assert!(Slot::new(0, 600, 600).is_err());
        assert!(Slot::new(0, 660, 600).is_err());
    }

    #[test]
    fn key_roundtrip_is_stable() {
        let professor = Uuid::new_v4();
        let key = SlotKey::new(professor, slot(3, 600, 660)).unwrap();
        let encoded = key.to_string();
        let parsed: SlotKey = encoded.parse().unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.to_string(), encoded);
    }

    #[test]
    fn key_parse_fails_fast_on_garbage() {
        assert!("not-a-key".parse::<SlotKey>().is_err());
        let professor = Uuid::new_v4();
        assert!(format!("{professor}:x:600-660").parse::<SlotKey>().is_err());
        assert!(format!("{professor}:3:abc-660").parse::<SlotKey>().is_err());
        // In-range fields but inverted span.
        assert!(format!("{professor}:3:660-600").parse::<SlotKey>().is_err());
    }

    #[test]
    fn chosen_slot_list_bounds() {
        let a = slot(1, 540, 600);
        let b = slot(3, 600, 660);
        assert!(validate_chosen_slots(&[]).is_err());
        assert!(validate_chosen_slots(&[a]).is_ok());
        assert!(validate_chosen_slots(&[a, b]).is_ok());
        assert!(validate_chosen_slots(&[a, a]).is_err());
        assert!(validate_chosen_slots(&[a, b, a]).is_err());
    }

    #[test]
    fn membership_is_structural() {
        let schedule = vec![slot(1, 540, 600), slot(3, 600, 660)];
        assert!(contains_slot(&schedule, &slot(3, 600, 660)));
        assert!(!contains_slot(&schedule, &slot(3, 600, 720)));
    }
}
