//! Conflict scan shared by the pack materializer and single bookings
//!
//! Generic over the connection so it runs both standalone and inside the
//! writing transaction.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use super::convert::{db_err, reservation_to_domain};
use crate::domain::schedule::{find_conflicts, ExpandedSlot, Occupancy, ScheduleConflict};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{reservation, room, user};

/// Every (slot, live reservation) overlap, with room and holder names.
pub(crate) async fn scan_conflicts<C: ConnectionTrait>(
    conn: &C,
    slots: &[ExpandedSlot],
) -> DomainResult<Vec<ScheduleConflict>> {
    let (Some(first), Some(last)) = (
        slots.iter().map(|s| s.date).min(),
        slots.iter().map(|s| s.date).max(),
    ) else {
        return Ok(Vec::new());
    };
    let room_ids: BTreeSet<i32> = slots.iter().map(|s| s.room_id).collect();

    let existing = reservation::Entity::find()
        .filter(reservation::Column::RoomId.is_in(room_ids.iter().copied()))
        .filter(reservation::Column::Date.between(first, last))
        .filter(reservation::Column::Status.ne(reservation::ReservationStatus::Cancelled))
        .all(conn)
        .await
        .map_err(db_err)?;
    debug!(
        "Conflict scan: {} slots, {} candidate reservations between {} and {}",
        slots.len(),
        existing.len(),
        first,
        last
    );

    let occupied = existing
        .into_iter()
        .map(|m| reservation_to_domain(m).map(|r| r.occupancy()))
        .collect::<DomainResult<Vec<Occupancy>>>()?;

    let clashes = find_conflicts(slots, &occupied);
    if clashes.is_empty() {
        return Ok(Vec::new());
    }

    let clash_rooms: BTreeSet<i32> = clashes.iter().map(|c| c.slot.room_id).collect();
    let room_names: HashMap<i32, String> = room::Entity::find()
        .filter(room::Column::Id.is_in(clash_rooms))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let holders: BTreeSet<i32> = clashes.iter().map(|c| c.occupancy.professional_id).collect();
    let holder_names: HashMap<i32, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(holders))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    Ok(clashes
        .into_iter()
        .map(|clash| {
            let room_name = room_names
                .get(&clash.slot.room_id)
                .cloned()
                .unwrap_or_else(|| format!("Room {}", clash.slot.room_id));
            let holder = holder_names
                .get(&clash.occupancy.professional_id)
                .cloned()
                .unwrap_or_else(|| format!("User {}", clash.occupancy.professional_id));
            clash.describe(room_name, holder)
        })
        .collect())
}
