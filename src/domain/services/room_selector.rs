use crate::domain::models::room::Room;

/// Smallest active room that seats the whole party. Capacity ties resolve by
/// room id so the pick is stable across calls.
pub fn select_room(party_size: i32, rooms: &[Room]) -> Option<&Room> {
    rooms
        .iter()
        .filter(|r| r.can_host(party_size))
        .min_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.id.cmp(&b.id)))
}
