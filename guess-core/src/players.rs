use std::sync::Arc;

use guess_types::{NameChange, PlayerCredentials, PlayerIdentity, PublicId, PublicPlayer, RoomStanding};
use tracing::info;

use crate::{LedgerError, LedgerResult, PlayerStore, generate_private_id};

/// Registration, identity checks and the read-side room views
pub struct PlayerService {
    store: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self) -> LedgerResult<PlayerCredentials> {
        let private_id = generate_private_id();
        let player = self.store.create(&private_id).await?;
        info!("Registered player {}", player.public_id);
        Ok(player.credentials())
    }

    /// Confirms that both identifiers belong to the same player
    pub async fn identify(
        &self,
        public_id: PublicId,
        private_id: &str,
    ) -> LedgerResult<Option<PlayerIdentity>> {
        let player = self.store.find_by_private_id(private_id).await?;
        Ok(player
            .filter(|player| player.public_id == public_id)
            .map(|player| PlayerIdentity {
                public_id: player.public_id,
            }))
    }

    pub async fn profile(&self, public_id: PublicId) -> LedgerResult<PublicPlayer> {
        self.store
            .find_by_public_id(public_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Player"))
    }

    pub async fn change_name(&self, private_id: &str, name: &str) -> LedgerResult<NameChange> {
        let player = self
            .store
            .find_by_private_id(private_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Player"))?;

        if player.name == name {
            return Ok(NameChange::Unchanged);
        }

        self.store.update_name(private_id, name).await?;
        info!("Player {} renamed to {:?}", player.public_id, name);
        Ok(NameChange::Changed)
    }

    pub async fn room_snapshot(&self, room_id: &str) -> LedgerResult<Vec<RoomStanding>> {
        Ok(self.store.list_room_snapshot(room_id).await?)
    }
}
