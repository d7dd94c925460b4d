use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{guesses, player_rooms, players, prelude::*};
use guess_core::{GuessPatch, GuessSelector, NewGuess, PlayerStore, StoreError};
use guess_types::{Guess, MutationResult, Player, PublicId, PublicPlayer, Room, RoomStanding};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL-backed `PlayerStore`. Rooms and guesses live in their own tables and
/// keep insertion order through their autoincrement keys.
pub struct PlayerRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_timeout(db, DEFAULT_STORE_TIMEOUT)
    }

    pub fn with_timeout(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn timed<T>(
        &self,
        operation: &'static str,
        query: impl Future<Output = Result<T, DbErr>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                tracing::error!("Store operation {} failed: {}", operation, err);
                Err(StoreError::Backend(err.to_string()))
            }
            Err(_) => {
                let millis = self.timeout.as_millis() as u64;
                tracing::error!("Store operation {} timed out after {}ms", operation, millis);
                Err(StoreError::Timeout { millis })
            }
        }
    }
}

fn to_guess(model: guesses::Model) -> Guess {
    Guess {
        id: model.id,
        attempt: model.attempt as u8,
        found: model.found,
        date: model.date,
        alias: model.alias,
        speed: model.speed,
        cheat: model.cheat,
    }
}

fn to_player(model: players::Model, rooms: Vec<Room>) -> Player {
    Player {
        public_id: model.id,
        private_id: model.private_id,
        name: model.name,
        rooms,
        last_guess_date: model.last_guess_date,
    }
}

fn new_guess_model(room_key: i64, guess: NewGuess) -> guesses::ActiveModel {
    guesses::ActiveModel {
        id: ActiveValue::NotSet,
        player_room_id: ActiveValue::Set(room_key),
        attempt: ActiveValue::Set(i16::from(guess.attempt)),
        found: ActiveValue::Set(guess.found),
        date: ActiveValue::Set(guess.date),
        alias: ActiveValue::Set(guess.alias),
        speed: ActiveValue::Set(guess.speed),
        cheat: ActiveValue::Set(guess.cheat),
    }
}

fn selector_condition(room_key: i64, selector: &GuessSelector) -> Condition {
    let by = match selector {
        GuessSelector::Id(id) => guesses::Column::Id.eq(*id),
        GuessSelector::Date(date) => guesses::Column::Date.eq(date.as_str()),
    };
    Condition::all()
        .add(guesses::Column::PlayerRoomId.eq(room_key))
        .add(by)
}

async fn player_by_private_id<C: ConnectionTrait>(
    db: &C,
    private_id: &str,
) -> Result<Option<players::Model>, DbErr> {
    Players::find()
        .filter(players::Column::PrivateId.eq(private_id))
        .one(db)
        .await
}

async fn room_of<C: ConnectionTrait>(
    db: &C,
    player_id: Uuid,
    room_id: &str,
) -> Result<Option<player_rooms::Model>, DbErr> {
    PlayerRooms::find()
        .filter(player_rooms::Column::PlayerId.eq(player_id))
        .filter(player_rooms::Column::RoomId.eq(room_id))
        .one(db)
        .await
}

/// Attaches guesses to room rows, keeping the owning player id alongside
async fn load_rooms<C: ConnectionTrait>(
    db: &C,
    rooms: Vec<player_rooms::Model>,
) -> Result<Vec<(Uuid, Room)>, DbErr> {
    if rooms.is_empty() {
        return Ok(Vec::new());
    }

    let room_keys: Vec<i64> = rooms.iter().map(|room| room.id).collect();
    let mut guesses_by_room: HashMap<i64, Vec<Guess>> = HashMap::new();
    for guess in Guesses::find()
        .filter(guesses::Column::PlayerRoomId.is_in(room_keys))
        .order_by_asc(guesses::Column::Id)
        .all(db)
        .await?
    {
        guesses_by_room
            .entry(guess.player_room_id)
            .or_default()
            .push(to_guess(guess));
    }

    Ok(rooms
        .into_iter()
        .map(|room| {
            let guesses = guesses_by_room.remove(&room.id).unwrap_or_default();
            (
                room.player_id,
                Room {
                    id: room.room_id,
                    guesses,
                },
            )
        })
        .collect())
}

async fn load_player<C: ConnectionTrait>(
    db: &C,
    model: players::Model,
    only_room: Option<player_rooms::Model>,
) -> Result<Player, DbErr> {
    let rooms = match only_room {
        Some(room) => vec![room],
        None => {
            PlayerRooms::find()
                .filter(player_rooms::Column::PlayerId.eq(model.id))
                .order_by_asc(player_rooms::Column::Id)
                .all(db)
                .await?
        }
    };
    let rooms = load_rooms(db, rooms)
        .await?
        .into_iter()
        .map(|(_, room)| room)
        .collect();
    Ok(to_player(model, rooms))
}

#[async_trait]
impl PlayerStore for PlayerRepository {
    async fn create(&self, private_id: &str) -> Result<Player, StoreError> {
        self.timed("create", async move {
            let model = players::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                private_id: ActiveValue::Set(private_id.to_string()),
                name: ActiveValue::Set(String::new()),
                last_guess_date: ActiveValue::Set(None),
                created_at: ActiveValue::Set(chrono::Utc::now().into()),
            };
            let inserted = Players::insert(model).exec(&self.db).await?;

            // Fetch the created player
            let created = Players::find_by_id(inserted.last_insert_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound("created player".to_string()))?;
            Ok(to_player(created, Vec::new()))
        })
        .await
    }

    async fn find_by_private_id(&self, private_id: &str) -> Result<Option<Player>, StoreError> {
        self.timed("find_by_private_id", async move {
            match player_by_private_id(&self.db, private_id).await? {
                Some(model) => Ok(Some(load_player(&self.db, model, None).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find_by_public_id(
        &self,
        public_id: PublicId,
    ) -> Result<Option<PublicPlayer>, StoreError> {
        self.timed("find_by_public_id", async move {
            let model = Players::find_by_id(public_id).one(&self.db).await?;
            Ok(model.map(|model| PublicPlayer {
                public_id: model.id,
                name: model.name,
            }))
        })
        .await
    }

    async fn find_player_with_room(
        &self,
        private_id: &str,
        room_id: &str,
    ) -> Result<Option<Player>, StoreError> {
        self.timed("find_player_with_room", async move {
            let Some(player) = player_by_private_id(&self.db, private_id).await? else {
                return Ok(None);
            };
            let Some(room) = room_of(&self.db, player.id, room_id).await? else {
                return Ok(None);
            };
            Ok(Some(load_player(&self.db, player, Some(room)).await?))
        })
        .await
    }

    async fn find_player_with_room_guess_on_date(
        &self,
        private_id: &str,
        room_id: &str,
        date: &str,
    ) -> Result<Option<Player>, StoreError> {
        self.timed("find_player_with_room_guess_on_date", async move {
            let Some(player) = player_by_private_id(&self.db, private_id).await? else {
                return Ok(None);
            };
            let Some(room) = room_of(&self.db, player.id, room_id).await? else {
                return Ok(None);
            };

            let played = Guesses::find()
                .filter(guesses::Column::PlayerRoomId.eq(room.id))
                .filter(guesses::Column::Date.eq(date))
                .count(&self.db)
                .await?;
            if played == 0 {
                return Ok(None);
            }
            Ok(Some(load_player(&self.db, player, Some(room)).await?))
        })
        .await
    }

    async fn update_name(&self, private_id: &str, name: &str) -> Result<(), StoreError> {
        self.timed("update_name", async move {
            Players::update_many()
                .col_expr(players::Column::Name, Expr::value(name))
                .filter(players::Column::PrivateId.eq(private_id))
                .exec(&self.db)
                .await?;
            Ok(())
        })
        .await
    }

    async fn push_room(&self, private_id: &str, room_id: &str) -> Result<(), StoreError> {
        self.timed("push_room", async move {
            let Some(player) = player_by_private_id(&self.db, private_id).await? else {
                return Ok(());
            };

            let room = player_rooms::ActiveModel {
                id: ActiveValue::NotSet,
                player_id: ActiveValue::Set(player.id),
                room_id: ActiveValue::Set(room_id.to_string()),
            };
            let inserted = PlayerRooms::insert(room)
                .on_conflict(
                    OnConflict::columns([
                        player_rooms::Column::PlayerId,
                        player_rooms::Column::RoomId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec(&self.db)
                .await;

            // A concurrent first submission may have created the room already
            match inserted {
                Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
                Err(err) => Err(err),
            }
        })
        .await
    }

    async fn append_guess(
        &self,
        private_id: &str,
        room_id: &str,
        guess: NewGuess,
    ) -> Result<(), StoreError> {
        self.timed("append_guess", async move {
            let txn = self.db.begin().await?;
            let Some(player) = player_by_private_id(&txn, private_id).await? else {
                return Ok(());
            };
            let Some(room) = room_of(&txn, player.id, room_id).await? else {
                return Ok(());
            };

            let date = guess.date.clone();
            Guesses::insert(new_guess_model(room.id, guess))
                .exec(&txn)
                .await?;
            Players::update_many()
                .col_expr(players::Column::LastGuessDate, Expr::value(date))
                .filter(players::Column::Id.eq(player.id))
                .exec(&txn)
                .await?;

            txn.commit().await
        })
        .await
    }

    async fn import_guesses(
        &self,
        private_id: &str,
        room_id: &str,
        guesses: Vec<NewGuess>,
    ) -> Result<(), StoreError> {
        self.timed("import_guesses", async move {
            if guesses.is_empty() {
                return Ok(());
            }

            let txn = self.db.begin().await?;
            let Some(player) = player_by_private_id(&txn, private_id).await? else {
                return Ok(());
            };
            let Some(room) = room_of(&txn, player.id, room_id).await? else {
                return Ok(());
            };

            let models: Vec<_> = guesses
                .into_iter()
                .map(|guess| new_guess_model(room.id, guess))
                .collect();
            Guesses::insert_many(models).exec(&txn).await?;

            txn.commit().await
        })
        .await
    }

    async fn mutate_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
        patch: GuessPatch,
    ) -> Result<MutationResult, StoreError> {
        self.timed("mutate_guess", async move {
            let Some(room) = room_of(&self.db, public_id, room_id).await? else {
                return Ok(MutationResult::default());
            };
            let condition = selector_condition(room.id, &selector);

            let txn = self.db.begin().await?;
            let matched = Guesses::find()
                .filter(condition.clone())
                .count(&txn)
                .await?;

            // Only rows where some patched field differs count as modified
            let mut update = Guesses::update_many().filter(condition);
            let mut differs = Condition::any();
            let mut has_changes = false;
            if let Some(date) = patch.date {
                update = update.col_expr(guesses::Column::Date, Expr::value(date.clone()));
                differs = differs.add(guesses::Column::Date.ne(date));
                has_changes = true;
            }
            if let Some(cheat) = patch.cheat {
                update = update.col_expr(guesses::Column::Cheat, Expr::value(cheat));
                differs = differs.add(guesses::Column::Cheat.ne(cheat));
                has_changes = true;
            }

            let modified = if has_changes {
                update.filter(differs).exec(&txn).await?.rows_affected
            } else {
                0
            };
            txn.commit().await?;

            Ok(MutationResult { matched, modified })
        })
        .await
    }

    async fn delete_guess(
        &self,
        public_id: PublicId,
        room_id: &str,
        selector: GuessSelector,
    ) -> Result<MutationResult, StoreError> {
        self.timed("delete_guess", async move {
            let Some(room) = room_of(&self.db, public_id, room_id).await? else {
                return Ok(MutationResult::default());
            };

            let removed = Guesses::delete_many()
                .filter(selector_condition(room.id, &selector))
                .exec(&self.db)
                .await?
                .rows_affected;
            Ok(MutationResult {
                matched: removed,
                modified: removed,
            })
        })
        .await
    }

    async fn delete_by_private_id(&self, private_id: &str) -> Result<(), StoreError> {
        self.timed("delete_by_private_id", async move {
            let txn = self.db.begin().await?;
            let Some(player) = player_by_private_id(&txn, private_id).await? else {
                return Ok(());
            };

            let room_keys: Vec<i64> = PlayerRooms::find()
                .filter(player_rooms::Column::PlayerId.eq(player.id))
                .all(&txn)
                .await?
                .into_iter()
                .map(|room| room.id)
                .collect();
            if !room_keys.is_empty() {
                Guesses::delete_many()
                    .filter(guesses::Column::PlayerRoomId.is_in(room_keys))
                    .exec(&txn)
                    .await?;
            }
            PlayerRooms::delete_many()
                .filter(player_rooms::Column::PlayerId.eq(player.id))
                .exec(&txn)
                .await?;
            Players::delete_by_id(player.id).exec(&txn).await?;

            txn.commit().await
        })
        .await
    }

    async fn list_room_snapshot(&self, room_id: &str) -> Result<Vec<RoomStanding>, StoreError> {
        self.timed("list_room_snapshot", async move {
            let rooms = PlayerRooms::find()
                .filter(player_rooms::Column::RoomId.eq(room_id))
                .order_by_asc(player_rooms::Column::Id)
                .all(&self.db)
                .await?;
            if rooms.is_empty() {
                return Ok(Vec::new());
            }

            let player_ids: Vec<Uuid> = rooms.iter().map(|room| room.player_id).collect();
            let names: HashMap<Uuid, String> = Players::find()
                .filter(players::Column::Id.is_in(player_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|player| (player.id, player.name))
                .collect();

            Ok(load_rooms(&self.db, rooms)
                .await?
                .into_iter()
                .filter_map(|(player_id, room)| {
                    let name = names.get(&player_id)?.clone();
                    Some(RoomStanding {
                        public_id: player_id,
                        name,
                        room,
                    })
                })
                .collect())
        })
        .await
    }
}
