use std::sync::Arc;

use guess_types::PlayerCredentials;
use tracing::info;

use crate::{LedgerError, LedgerResult, NewGuess, PlayerStore, room_index};

/// Folds a duplicate identity into the one being kept
pub struct MergeService {
    store: Arc<dyn PlayerStore>,
}

impl MergeService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    /// Copies every room and guess of `drop_private_id` onto `keep_private_id`,
    /// then deletes the dropped player.
    ///
    /// Guesses are appended as-is, so the result can hold several guesses for
    /// the same room and day. The steps are not atomic: a failure after some
    /// rooms were copied leaves the dropped player in place, and a retry
    /// copies those rooms again.
    pub async fn merge(
        &self,
        keep_private_id: &str,
        drop_private_id: &str,
    ) -> LedgerResult<PlayerCredentials> {
        if keep_private_id == drop_private_id {
            return Err(LedgerError::validation("Cannot merge a player into itself"));
        }

        let kept = self
            .store
            .find_by_private_id(keep_private_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Player to merge into"))?;
        let dropped = self
            .store
            .find_by_private_id(drop_private_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Player to be merged"))?;

        let mut copied = 0;
        for room in &dropped.rooms {
            if !room_index::contains_room(&kept.rooms, &room.id) {
                self.store.push_room(keep_private_id, &room.id).await?;
            }

            let guesses: Vec<NewGuess> = room.guesses.iter().map(NewGuess::from).collect();
            copied += guesses.len();
            self.store
                .import_guesses(keep_private_id, &room.id, guesses)
                .await?;
        }

        self.store.delete_by_private_id(drop_private_id).await?;
        info!(
            "Merged player {} into {} ({} rooms, {} guesses)",
            dropped.public_id,
            kept.public_id,
            dropped.rooms.len(),
            copied
        );

        Ok(kept.credentials())
    }
}
