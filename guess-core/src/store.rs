use async_trait::async_trait;
use guess_types::{GuessId, MutationResult, Player, PublicId, PublicPlayer, RoomStanding};

use crate::StoreError;

/// A guess as written by the store; the store assigns the element id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGuess {
    pub attempt: u8,
    pub found: bool,
    pub date: String,
    pub alias: String,
    pub speed: Option<String>,
    pub cheat: bool,
}

impl From<&guess_types::Guess> for NewGuess {
    fn from(guess: &guess_types::Guess) -> Self {
        Self {
            attempt: guess.attempt,
            found: guess.found,
            date: guess.date.clone(),
            alias: guess.alias.clone(),
            speed: guess.speed.clone(),
            cheat: guess.cheat,
        }
    }
}

/// Addresses guesses inside one room
#[derive(Debug, Clone, PartialEq)]
pub enum GuessSelector {
    Id(GuessId),
    Date(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuessPatch {
    pub date: Option<String>,
    pub cheat: Option<bool>,
}

impl GuessSelector {
    pub fn matches(&self, guess: &guess_types::Guess) -> bool {
        match self {
            GuessSelector::Id(id) => guess.id == *id,
            GuessSelector::Date(date) => guess.date == *date,
        }
    }
}

impl GuessPatch {
    /// Applies the patch, returning whether anything changed
    pub fn apply(&self, guess: &mut guess_types::Guess) -> bool {
        let mut changed = false;
        if let Some(date) = &self.date {
            if guess.date != *date {
                guess.date = date.clone();
                changed = true;
            }
        }
        if let Some(cheat) = self.cheat {
            if guess.cheat != cheat {
                guess.cheat = cheat;
                changed = true;
            }
        }
        changed
    }
}

/// Persistence contract for player records and their rooms and guesses.
///
/// Writes keyed by a private or public id that matches nothing are no-ops.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn create(&self, private_id: &str) -> Result<Player, StoreError>;

    async fn find_by_private_id(&self, private_id: &str) -> Result<Option<Player>, StoreError>;

    async fn find_by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<PublicPlayer>, StoreError>;

    /// Player with `rooms` narrowed to `room_id`, or `None` when that room does not exist
    async fn find_player_with_room(
        &self,
        private_id: &str,
        room_id: &str,
    ) -> Result<Option<Player>, StoreError>;

    async fn find_player_with_room_guess_on_date(
        &self,
        private_id: &str,
        room_id: &str,
        date: &str,
    ) -> Result<Option<Player>, StoreError>;

    async fn update_name(&self, private_id: &str, name: &str) -> Result<(), StoreError>;

    async fn push_room(&self, private_id: &str, room_id: &str) -> Result<(), StoreError>;

    /// Appends one guess and sets `last_guess_date` to its date in the same write
    async fn append_guess(
        &self,
        private_id: &str,
        room_id: &str,
        guess: NewGuess,
    ) -> Result<(), StoreError>;

    /// Appends guesses in order without touching `last_guess_date`
    async fn import_guesses(
        &self,
        private_id: &str,
        room_id: &str,
        guesses: Vec<NewGuess>,
    ) -> Result<(), StoreError>;

    async fn mutate_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
        patch: GuessPatch,
    ) -> Result<MutationResult, StoreError>;

    async fn delete_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
    ) -> Result<MutationResult, StoreError>;

    async fn delete_by_private_id(&self, private_id: &str) -> Result<(), StoreError>;

    async fn list_room_snapshot(&self, room_id: &str) -> Result<Vec<RoomStanding>, StoreError>;
}
