use guess_types::Room;

/// Finds the room with `room_id` in a player's room list
pub fn find_room<'a>(rooms: &'a [Room], room_id: &str) -> Option<&'a Room> {
    rooms.iter().find(|room| room.id == room_id)
}

pub fn contains_room(rooms: &[Room], room_id: &str) -> bool {
    find_room(rooms, room_id).is_some()
}
