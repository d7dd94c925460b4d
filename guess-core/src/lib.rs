pub mod clock;
pub mod correction;
pub mod error;
pub mod merge;
pub mod players;
pub mod room_index;
pub mod store;
pub mod submission;
pub mod token;

// Re-export main components
pub use clock::*;
pub use correction::*;
pub use error::*;
pub use merge::*;
pub use players::*;
pub use store::*;
pub use submission::*;
pub use token::*;
