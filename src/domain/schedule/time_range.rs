//! Time-of-day intervals and the overlap test behind every booking check.

use chrono::NaiveTime;

use crate::domain::{DomainError, DomainResult};

/// Half-open `[start, end)` interval within a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::Validation(format!(
                "start time {} must be before end time {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a pair of `HH:MM` (or `HH:MM:SS`) strings.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::new(parse_time(start)?, parse_time(end)?)
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// `self.start < other.end && self.end > other.start`.
    ///
    /// Touching ranges (`[9:00,10:00)` and `[10:00,11:00)`) do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Parse a wall-clock time in `HH:MM` or `HH:MM:SS` form.
pub fn parse_time(value: &str) -> DomainResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| DomainError::Validation(format!("invalid time '{}', expected HH:MM", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(start, end).unwrap()
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let morning = range("09:00", "10:00");
        let next = range("10:00", "11:00");
        assert!(!morning.overlaps(&next));
        assert!(!next.overlaps(&morning));
    }

    #[test]
    fn partial_overlap_is_detected_both_ways() {
        let a = range("09:00", "10:00");
        let b = range("09:30", "10:30");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_overlaps() {
        let outer = range("08:00", "12:00");
        let inner = range("09:15", "09:45");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&outer));
    }

    #[test]
    fn overlap_is_symmetric_over_a_grid() {
        let starts = ["08:00", "08:30", "09:00", "09:30", "10:00", "10:30"];
        let mut ranges = Vec::new();
        for s in starts {
            for e in ["09:00", "10:00", "11:00"] {
                if let Ok(r) = TimeRange::parse(s, e) {
                    ranges.push(r);
                }
            }
        }
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{} vs {}", a, b);
                let disjoint = a.end() <= b.start() || b.end() <= a.start();
                assert_eq!(a.overlaps(b), !disjoint, "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn start_must_precede_end() {
        assert!(TimeRange::parse("10:00", "10:00").is_err());
        assert!(TimeRange::parse("11:00", "10:00").is_err());
    }

    #[test]
    fn parses_seconds_and_rejects_garbage() {
        assert_eq!(range("09:00:00", "10:00").to_string(), "09:00-10:00");
        assert!(parse_time("9h").is_err());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn duration_in_minutes() {
        assert_eq!(range("09:00", "10:30").duration_minutes(), 90);
    }
}
