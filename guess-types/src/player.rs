use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GuessId, PublicId};

/// Full player record. Only ever handed back to the owner of `private_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub public_id: PublicId,
    pub private_id: String,
    pub name: String,
    pub rooms: Vec<Room>,
    pub last_guess_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Room {
    pub id: String,
    pub guesses: Vec<Guess>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    #[ts(type = "number")]
    pub id: GuessId,
    pub attempt: u8,
    pub found: bool,
    pub date: String, // M/D/YYYY in the server's local time
    pub alias: String,
    pub speed: Option<String>,
    pub cheat: bool,
}

/// Identity fields that are safe to show to other players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PublicPlayer {
    pub public_id: PublicId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerIdentity {
    pub public_id: PublicId,
}

/// Returned once at registration (and to the surviving side of a merge)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerCredentials {
    pub public_id: PublicId,
    pub private_id: String,
}

/// One player's history inside a single room, as shown on the room leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomStanding {
    pub public_id: PublicId,
    pub name: String,
    pub room: Room,
}

impl Player {
    pub fn credentials(&self) -> PlayerCredentials {
        PlayerCredentials {
            public_id: self.public_id,
            private_id: self.private_id.clone(),
        }
    }

    /// Drops the private id. Keeps only the first room, which is what the
    /// room-filtered store lookups return.
    pub fn into_standing(self) -> Option<RoomStanding> {
        let room = self.rooms.into_iter().next()?;
        Some(RoomStanding {
            public_id: self.public_id,
            name: self.name,
            room,
        })
    }

    pub fn guess_count(&self) -> usize {
        self.rooms.iter().map(|room| room.guesses.len()).sum()
    }
}
