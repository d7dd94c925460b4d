pub use super::guesses::Entity as Guesses;
pub use super::player_rooms::Entity as PlayerRooms;
pub use super::players::Entity as Players;
