//! Weekly pattern expansion
//!
//! Turns `(weekday, time range, room)` patterns into concrete dated slots
//! over an inclusive date range. Weekdays use the 0–6 numbering with
//! 0 = Sunday.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use super::time_range::TimeRange;
use crate::domain::{DomainError, DomainResult};

/// Convert a 0–6 weekday index (0 = Sunday) into a [`Weekday`].
pub fn weekday_from_index(index: u8) -> DomainResult<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(DomainError::Validation(format!(
            "weekday must be between 0 and 6, got {}",
            other
        ))),
    }
}

/// Inverse of [`weekday_from_index`].
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// One recurring weekly booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPattern {
    pub weekday: Weekday,
    pub range: TimeRange,
    pub room_id: i32,
}

impl SlotPattern {
    pub fn new(weekday_idx: u8, range: TimeRange, room_id: i32) -> DomainResult<Self> {
        Ok(Self {
            weekday: weekday_from_index(weekday_idx)?,
            range,
            room_id,
        })
    }
}

/// Inclusive calendar range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> DomainResult<Self> {
        if from > to {
            return Err(DomainError::Validation(format!(
                "date range start {} is after its end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days in the range, both ends included.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |d| *d <= to)
    }
}

/// A concrete, dated booking produced by expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedSlot {
    pub date: NaiveDate,
    pub range: TimeRange,
    pub room_id: i32,
}

impl ExpandedSlot {
    pub fn weekday(&self) -> u8 {
        weekday_index(self.date.weekday())
    }
}

/// Expand weekly patterns over `range`.
///
/// Output is chronological; slots on the same date keep pattern order.
pub fn expand(patterns: &[SlotPattern], range: DateRange) -> Vec<ExpandedSlot> {
    let mut slots = Vec::new();
    for date in range.iter() {
        let weekday = date.weekday();
        for pattern in patterns.iter().filter(|p| p.weekday == weekday) {
            slots.push(ExpandedSlot {
                date,
                range: pattern.range,
                room_id: pattern.room_id,
            });
        }
    }
    slots
}

/// Reject requests whose own patterns collide (same room, same weekday,
/// overlapping ranges).
pub fn ensure_patterns_disjoint(patterns: &[SlotPattern]) -> DomainResult<()> {
    for (i, a) in patterns.iter().enumerate() {
        for b in &patterns[i + 1..] {
            if a.room_id == b.room_id && a.weekday == b.weekday && a.range.overlaps(&b.range) {
                return Err(DomainError::Validation(format!(
                    "weekly slots {} and {} overlap in room {} on weekday {}",
                    a.range,
                    b.range,
                    a.room_id,
                    weekday_index(a.weekday)
                )));
            }
        }
    }
    Ok(())
}

/// How far ahead assignments may be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingWindow {
    /// Deadline used when the request leaves it out, counted from the start date.
    pub default_months: u32,
    /// Latest accepted deadline, counted from today.
    pub max_months: u32,
}

impl Default for SchedulingWindow {
    fn default() -> Self {
        Self {
            default_months: 3,
            max_months: 12,
        }
    }
}

impl SchedulingWindow {
    /// Resolve the requested start date and deadline into the range to expand.
    pub fn resolve(
        &self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        deadline: Option<NaiveDate>,
    ) -> DomainResult<DateRange> {
        let from = start.unwrap_or(today);
        if from < today {
            return Err(DomainError::Validation(format!(
                "start date {} is in the past",
                from
            )));
        }

        let latest = add_months(today, self.max_months)?;
        let deadline = match deadline {
            Some(d) => d,
            None => add_months(from, self.default_months)?.min(latest),
        };

        if deadline < today {
            return Err(DomainError::Validation(format!(
                "deadline {} is in the past",
                deadline
            )));
        }
        if deadline > latest {
            return Err(DomainError::Validation(format!(
                "deadline {} is more than {} months ahead (latest {})",
                deadline, self.max_months, latest
            )));
        }
        if deadline < from {
            return Err(DomainError::Validation(format!(
                "deadline {} is before start date {}",
                deadline, from
            )));
        }

        DateRange::new(from, deadline)
    }
}

fn add_months(date: NaiveDate, months: u32) -> DomainResult<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| DomainError::Validation(format!("date {} is out of range", date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pattern(weekday: u8, start: &str, end: &str, room_id: i32) -> SlotPattern {
        SlotPattern::new(weekday, TimeRange::parse(start, end).unwrap(), room_id).unwrap()
    }

    /// Count of dates in `range` falling on `weekday`, computed arithmetically.
    fn expected_count(range: DateRange, weekday: Weekday) -> i64 {
        let first = range.from().weekday().num_days_from_sunday() as i64;
        let target = weekday.num_days_from_sunday() as i64;
        let offset = (target - first).rem_euclid(7);
        if offset >= range.days() {
            0
        } else {
            (range.days() - 1 - offset) / 7 + 1
        }
    }

    #[test]
    fn mondays_of_september_2025() {
        let range = DateRange::new(date("2025-09-01"), date("2025-09-30")).unwrap();
        let slots = expand(&[pattern(1, "09:00", "10:00", 1)], range);
        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2025-09-01"),
                date("2025-09-08"),
                date("2025-09-15"),
                date("2025-09-22"),
                date("2025-09-29"),
            ]
        );
        assert!(slots.iter().all(|s| s.weekday() == 1 && s.room_id == 1));
    }

    #[test]
    fn count_matches_weekday_arithmetic() {
        let start = date("2025-01-01");
        for offset in 0..7 {
            for len in [1_i64, 6, 7, 8, 30, 31, 90, 365] {
                let from = start + chrono::Duration::days(offset);
                let to = from + chrono::Duration::days(len - 1);
                let range = DateRange::new(from, to).unwrap();
                for weekday in 0..7u8 {
                    let p = pattern(weekday, "08:00", "09:00", 1);
                    let slots = expand(&[p], range);
                    assert_eq!(
                        slots.len() as i64,
                        expected_count(range, p.weekday),
                        "from {} len {} weekday {}",
                        from,
                        len,
                        weekday
                    );
                    assert!(slots.iter().all(|s| s.date.weekday() == p.weekday));
                }
            }
        }
    }

    #[test]
    fn multiple_patterns_stay_chronological() {
        let range = DateRange::new(date("2025-09-01"), date("2025-09-07")).unwrap();
        let slots = expand(
            &[
                pattern(3, "10:00", "11:00", 2),
                pattern(1, "09:00", "10:00", 1),
                pattern(1, "11:00", "12:00", 1),
            ],
            range,
        );
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].date, date("2025-09-01"));
        assert_eq!(slots[1].date, date("2025-09-01"));
        assert_eq!(slots[0].range.to_string(), "09:00-10:00");
        assert_eq!(slots[2].date, date("2025-09-03"));
    }

    #[test]
    fn weekday_index_roundtrip() {
        for i in 0..7u8 {
            assert_eq!(weekday_index(weekday_from_index(i).unwrap()), i);
        }
        assert!(weekday_from_index(7).is_err());
        assert_eq!(weekday_from_index(0).unwrap(), Weekday::Sun);
    }

    #[test]
    fn overlapping_patterns_in_same_room_are_rejected() {
        let ok = [pattern(1, "09:00", "10:00", 1), pattern(1, "10:00", "11:00", 1)];
        assert!(ensure_patterns_disjoint(&ok).is_ok());

        let other_room = [pattern(1, "09:00", "10:00", 1), pattern(1, "09:00", "10:00", 2)];
        assert!(ensure_patterns_disjoint(&other_room).is_ok());

        let clash = [pattern(1, "09:00", "10:00", 1), pattern(1, "09:30", "10:30", 1)];
        assert!(ensure_patterns_disjoint(&clash).is_err());
    }

    #[test]
    fn window_defaults_to_three_months() {
        let window = SchedulingWindow::default();
        let today = date("2025-09-01");
        let range = window.resolve(today, None, None).unwrap();
        assert_eq!(range.from(), today);
        assert_eq!(range.to(), date("2025-12-01"));
    }

    #[test]
    fn window_rejects_past_and_far_deadlines() {
        let window = SchedulingWindow::default();
        let today = date("2025-09-10");
        assert!(window.resolve(today, None, Some(date("2025-09-09"))).is_err());
        assert!(window.resolve(today, None, Some(date("2026-09-11"))).is_err());
        assert!(window.resolve(today, None, Some(date("2026-09-10"))).is_ok());
        assert!(window
            .resolve(today, Some(date("2025-10-01")), Some(date("2025-09-20")))
            .is_err());
        assert!(window.resolve(today, Some(date("2025-09-01")), None).is_err());
    }

    #[test]
    fn default_deadline_is_capped_by_max_window() {
        let window = SchedulingWindow::default();
        let today = date("2025-01-01");
        let range = window
            .resolve(today, Some(date("2025-11-15")), None)
            .unwrap();
        assert_eq!(range.to(), date("2026-01-01"));
    }
}
