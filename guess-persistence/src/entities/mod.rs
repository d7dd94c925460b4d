pub mod prelude;

pub mod guesses;
pub mod player_rooms;
pub mod players;
