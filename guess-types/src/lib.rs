pub mod player;
pub mod messages;
pub mod errors;

pub type PublicId = uuid::Uuid;
pub type GuessId = i64;

// Re-export all types
pub use player::*;
pub use messages::*;
pub use errors::*;
