//! Expansion of recurring slots into concrete calendar occurrences.
//!
//! Purely a function of the chosen slots and the month's calendar; callers
//! overlay attendance and reschedule state separately.

use chrono::{Datelike, NaiveDate};

use crate::contract::model::{Occurrence, Slot};
use crate::domain::error::DomainError;

/// First day of a Gregorian month, validating `month` in 1..=12.
pub fn month_start(year: i32, month: u32) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DomainError::validation("month", format!("invalid year/month {year}-{month}"))
    })
}

/// Last day of a Gregorian month.
pub fn month_end(year: i32, month: u32) -> Result<NaiveDate, DomainError> {
    let next = if month == 12 {
        month_start(year + 1, 1)?
    } else {
        month_start(year, month + 1)?
    };
    Ok(next.pred_opt().unwrap_or(next))
}

/// Weekday of `date` in the 0..=6, 0 = Sunday convention used by [`Slot`].
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Expand `slots` into dated occurrences over the month, sorted ascending
/// by date then start time. Finite and restartable: the same inputs always
/// produce the same sequence.
pub fn expand(slots: &[Slot], year: i32, month: u32) -> Result<Vec<Occurrence>, DomainError> {
    for slot in slots {
        slot.validate()?;
    }
    let mut out = Vec::new();
    let mut day = month_start(year, month)?;
    while day.month() == month {
        for slot in slots {
            if slot.day_of_week == weekday_index(day) {
                out.push(Occurrence {
                    date: day,
                    starts_at: starts_at(day, slot),
                    slot: *slot,
                });
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    out.sort_by_key(|o| (o.date, o.slot.start_min));
    Ok(out)
}

/// UTC instant at which an occurrence of `slot` starts on `date`.
pub fn starts_at(date: NaiveDate, slot: &Slot) -> chrono::DateTime<chrono::Utc> {
    let hour = u32::from(slot.start_min) / 60;
    let minute = u32::from(slot.start_min) % 60;
    // In range for any validated slot: start_min < 1440.
    let time = chrono::NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(chrono::NaiveTime::MIN);
    date.and_time(time).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Slot;
    use chrono::Timelike;

    #[test]
    fn wednesday_slot_expands_to_four_occurrences() {
        // September 2025 has four Wednesdays: 3, 10, 17, 24.
        let slot = Slot::new(3, 600, 660).unwrap();
        let occurrences = expand(&[slot], 2025, 9).unwrap();
        assert_eq!(occurrences.len(), 4);
        let days: Vec<u32> = occurrences.iter().map(|o| o.date.day()).collect();
        assert_eq!(days, vec![3, 10, 17, 24]);
        for o in &occurrences {
            assert_eq!(o.starts_at.hour(), 10);
            assert_eq!(o.starts_at.minute(), 0);
        }
    }

    #[test]
    fn two_slots_interleave_sorted_by_date() {
        let monday = Slot::new(1, 540, 600).unwrap();
        let friday = Slot::new(5, 540, 600).unwrap();
        let occurrences = expand(&[friday, monday], 2025, 9).unwrap();
        let mut sorted = occurrences.clone();
        sorted.sort_by_key(|o| o.date);
        assert_eq!(occurrences, sorted);
        // September 2025: five Mondays, four Fridays.
        assert_eq!(occurrences.len(), 9);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let slot = Slot::new(3, 600, 660).unwrap();
        assert!(expand(&[slot], 2025, 13).is_err());
        assert!(expand(&[slot], 2025, 0).is_err());
    }

    #[test]
    fn weekday_convention_is_sunday_zero() {
        // 2025-09-07 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday.succ_opt().unwrap()), 1);
    }

    #[test]
    fn month_bounds() {
        assert_eq!(
            month_end(2025, 9).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap()
        );
        assert_eq!(
            month_end(2025, 12).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
        assert_eq!(
            month_end(2024, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
