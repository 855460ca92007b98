//! Conflict detection between requested slots and existing bookings.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::time_range::TimeRange;
use super::weekly_pattern::ExpandedSlot;

/// A live (non-cancelled) booking holding a room for a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    pub reservation_id: i32,
    pub room_id: i32,
    pub professional_id: i32,
    pub date: NaiveDate,
    pub range: TimeRange,
}

/// A requested slot paired with one booking it collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotClash {
    pub slot: ExpandedSlot,
    pub occupancy: Occupancy,
}

impl SlotClash {
    /// Attach display names for reporting.
    pub fn describe(
        self,
        room_name: impl Into<String>,
        professional_name: impl Into<String>,
    ) -> ScheduleConflict {
        ScheduleConflict {
            date: self.slot.date,
            weekday: self.slot.weekday(),
            room_id: self.slot.room_id,
            room_name: room_name.into(),
            requested: self.slot.range,
            existing: self.occupancy.range,
            existing_reservation_id: self.occupancy.reservation_id,
            existing_professional_id: self.occupancy.professional_id,
            existing_professional: professional_name.into(),
        }
    }
}

/// Reportable conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConflict {
    pub date: NaiveDate,
    pub weekday: u8,
    pub room_id: i32,
    pub room_name: String,
    pub requested: TimeRange,
    pub existing: TimeRange,
    pub existing_reservation_id: i32,
    pub existing_professional_id: i32,
    pub existing_professional: String,
}

impl ScheduleConflict {
    pub fn description(&self) -> String {
        format!(
            "{} on {}: requested {} overlaps reservation #{} ({}) held by {}",
            self.room_name,
            self.date,
            self.requested,
            self.existing_reservation_id,
            self.existing,
            self.existing_professional
        )
    }
}

/// Pair every requested slot with each occupancy it overlaps.
///
/// Result order follows `slots`, then `occupied`. Pure and deterministic.
pub fn find_conflicts(slots: &[ExpandedSlot], occupied: &[Occupancy]) -> Vec<SlotClash> {
    let mut by_room_day: HashMap<(i32, NaiveDate), Vec<&Occupancy>> = HashMap::new();
    for occupancy in occupied {
        by_room_day
            .entry((occupancy.room_id, occupancy.date))
            .or_default()
            .push(occupancy);
    }

    let mut clashes = Vec::new();
    for slot in slots {
        let Some(candidates) = by_room_day.get(&(slot.room_id, slot.date)) else {
            continue;
        };
        for occupancy in candidates {
            if slot.range.overlaps(&occupancy.range) {
                clashes.push(SlotClash {
                    slot: *slot,
                    occupancy: **occupancy,
                });
            }
        }
    }
    clashes
}
