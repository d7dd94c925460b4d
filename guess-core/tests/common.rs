#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use guess_core::{
    CorrectionService, FixedClock, GuessPatch, GuessSelector, GuessSubmissionService,
    MergeService, NewGuess, PlayerService, PlayerStore, StoreError,
};
use guess_types::{
    AttemptValue, Guess, GuessId, MutationResult, Player, PublicId, PublicPlayer, Room,
    RoomStanding, SubmitGuessRequest,
};

/// Vec-backed store with the same semantics as the SQL repository
#[derive(Default)]
pub struct InMemoryPlayerStore {
    players: Mutex<Vec<Player>>,
    next_guess_id: Mutex<GuessId>,
    calls: AtomicUsize,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn player(&self, private_id: &str) -> Option<Player> {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.private_id == private_id)
            .cloned()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn next_id(&self) -> GuessId {
        let mut next = self.next_guess_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn with_room<R>(
        &self,
        public_id: PublicId,
        room_id: &str,
        f: impl FnOnce(&mut Room) -> R,
    ) -> Option<R> {
        let mut players = self.players.lock().unwrap();
        players
            .iter_mut()
            .find(|p| p.public_id == public_id)
            .and_then(|p| p.rooms.iter_mut().find(|r| r.id == room_id))
            .map(f)
    }

    fn narrowed(player: &Player, room_id: &str) -> Option<Player> {
        let room = player.rooms.iter().find(|r| r.id == room_id)?.clone();
        Some(Player {
            rooms: vec![room],
            ..player.clone()
        })
    }

    fn append(&self, private_id: &str, room_id: &str, guess: NewGuess) -> Option<()> {
        let id = self.next_id();
        let mut players = self.players.lock().unwrap();
        let player = players.iter_mut().find(|p| p.private_id == private_id)?;
        let room = player.rooms.iter_mut().find(|r| r.id == room_id)?;
        room.guesses.push(Guess {
            id,
            attempt: guess.attempt,
            found: guess.found,
            date: guess.date,
            alias: guess.alias,
            speed: guess.speed,
            cheat: guess.cheat,
        });
        Some(())
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn create(&self, private_id: &str) -> Result<Player, StoreError> {
        self.touch();
        let player = Player {
            public_id: uuid::Uuid::new_v4(),
            private_id: private_id.to_string(),
            name: String::new(),
            rooms: Vec::new(),
            last_guess_date: None,
        };
        self.players.lock().unwrap().push(player.clone());
        Ok(player)
    }

    async fn find_by_private_id(&self, private_id: &str) -> Result<Option<Player>, StoreError> {
        self.touch();
        Ok(self.player(private_id))
    }

    async fn find_by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<PublicPlayer>, StoreError> {
        self.touch();
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .find(|p| p.public_id == public_id)
            .map(|p| PublicPlayer {
                public_id: p.public_id,
                name: p.name.clone(),
            }))
    }

    async fn find_player_with_room(
        &self,
        private_id: &str,
        room_id: &str,
    ) -> Result<Option<Player>, StoreError> {
        self.touch();
        Ok(self
            .player(private_id)
            .and_then(|p| Self::narrowed(&p, room_id)))
    }

    async fn find_player_with_room_guess_on_date(
        &self,
        private_id: &str,
        room_id: &str,
        date: &str,
    ) -> Result<Option<Player>, StoreError> {
        self.touch();
        Ok(self
            .player(private_id)
            .and_then(|p| Self::narrowed(&p, room_id))
            .filter(|p| p.rooms[0].guesses.iter().any(|g| g.date == date)))
    }

    async fn update_name(&self, private_id: &str, name: &str) -> Result<(), StoreError> {
        self.touch();
        let mut players = self.players.lock().unwrap();
        if let Some(player) = players.iter_mut().find(|p| p.private_id == private_id) {
            player.name = name.to_string();
        }
        Ok(())
    }

    async fn push_room(&self, private_id: &str, room_id: &str) -> Result<(), StoreError> {
        self.touch();
        let mut players = self.players.lock().unwrap();
        if let Some(player) = players.iter_mut().find(|p| p.private_id == private_id) {
            if !player.rooms.iter().any(|r| r.id == room_id) {
                player.rooms.push(Room {
                    id: room_id.to_string(),
                    guesses: Vec::new(),
                });
            }
        }
        Ok(())
    }

    async fn append_guess(
        &self,
        private_id: &str,
        room_id: &str,
        guess: NewGuess,
    ) -> Result<(), StoreError> {
        self.touch();
        let date = guess.date.clone();
        if self.append(private_id, room_id, guess).is_some() {
            let mut players = self.players.lock().unwrap();
            if let Some(player) = players.iter_mut().find(|p| p.private_id == private_id) {
                player.last_guess_date = Some(date);
            }
        }
        Ok(())
    }

    async fn import_guesses(
        &self,
        private_id: &str,
        room_id: &str,
        guesses: Vec<NewGuess>,
    ) -> Result<(), StoreError> {
        self.touch();
        for guess in guesses {
            self.append(private_id, room_id, guess);
        }
        Ok(())
    }

    async fn mutate_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
        patch: GuessPatch,
    ) -> Result<MutationResult, StoreError> {
        self.touch();
        Ok(self
            .with_room(public_id, room_id, |room| {
                let mut result = MutationResult::default();
                for guess in room.guesses.iter_mut().filter(|g| selector.matches(g)) {
                    result.matched += 1;
                    if patch.apply(guess) {
                        result.modified += 1;
                    }
                }
                result
            })
            .unwrap_or_default())
    }

    async fn delete_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
    ) -> Result<MutationResult, StoreError> {
        self.touch();
        Ok(self
            .with_room(public_id, room_id, |room| {
                let before = room.guesses.len();
                room.guesses.retain(|g| !selector.matches(g));
                let removed = (before - room.guesses.len()) as u64;
                MutationResult {
                    matched: removed,
                    modified: removed,
                }
            })
            .unwrap_or_default())
    }

    async fn delete_by_private_id(&self, private_id: &str) -> Result<(), StoreError> {
        self.touch();
        self.players
            .lock()
            .unwrap()
            .retain(|p| p.private_id != private_id);
        Ok(())
    }

    async fn list_room_snapshot(&self, room_id: &str) -> Result<Vec<RoomStanding>, StoreError> {
        self.touch();
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter_map(|p| Self::narrowed(p, room_id))
            .filter_map(|p| p.into_standing())
            .collect())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Services wired to one shared in-memory store and a pinned day
pub struct TestLedger {
    pub store: Arc<InMemoryPlayerStore>,
    pub players: PlayerService,
    pub submissions: GuessSubmissionService,
    pub corrections: CorrectionService,
    pub merges: MergeService,
}

impl TestLedger {
    pub fn on(date: NaiveDate) -> Self {
        Self::with_store(Arc::new(InMemoryPlayerStore::new()), date)
    }

    /// Same store, different day
    pub fn with_store(store: Arc<InMemoryPlayerStore>, date: NaiveDate) -> Self {
        let dyn_store: Arc<dyn PlayerStore> = store.clone();
        Self {
            store,
            players: PlayerService::new(dyn_store.clone()),
            submissions: GuessSubmissionService::new(
                dyn_store.clone(),
                Arc::new(FixedClock::new(date)),
            ),
            corrections: CorrectionService::new(dyn_store.clone()),
            merges: MergeService::new(dyn_store),
        }
    }
}

pub fn guess_request(private_id: &str, room_id: &str, attempt: i64, alias: &str) -> SubmitGuessRequest {
    SubmitGuessRequest {
        private_id: private_id.to_string(),
        alias: alias.to_string(),
        room_id: room_id.to_string(),
        attempt: AttemptValue::Number(attempt),
        found: true,
        speed: None,
    }
}
