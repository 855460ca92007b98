//! Scheduling primitives
//!
//! Pure building blocks shared by pack assignments and single bookings:
//! the overlap test, weekly pattern expansion and conflict detection.

pub mod conflict;
pub mod time_range;
pub mod weekly_pattern;

pub use conflict::{find_conflicts, Occupancy, ScheduleConflict, SlotClash};
pub use time_range::{parse_time, TimeRange};
pub use weekly_pattern::{
    ensure_patterns_disjoint, expand, weekday_from_index, weekday_index, DateRange, ExpandedSlot,
    SchedulingWindow, SlotPattern,
};
