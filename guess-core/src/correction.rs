use std::sync::Arc;

use guess_types::{GuessId, MutationResult, PublicId};
use tracing::{info, warn};

use crate::{GuessPatch, GuessSelector, LedgerError, LedgerResult, PlayerStore};

/// Proof that the caller passed the admin gate. Only `AdminGate::verify` creates one.
#[derive(Debug)]
pub struct AdminCapability {
    _private: (),
}

/// Compares presented admin secrets against the configured one.
/// With no configured secret every request is denied.
#[derive(Debug, Clone)]
pub struct AdminGate {
    secret: Option<String>,
}

impl AdminGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|secret| !secret.is_empty()),
        }
    }

    pub fn verify(&self, presented: Option<&str>) -> LedgerResult<AdminCapability> {
        match (&self.secret, presented) {
            (Some(secret), Some(presented)) if secret == presented => {
                Ok(AdminCapability { _private: () })
            }
            _ => {
                warn!("Rejected admin request");
                Err(LedgerError::AdminDenied)
            }
        }
    }
}

/// Admin edits of recorded history
pub struct CorrectionService {
    store: Arc<dyn PlayerStore>,
}

impl CorrectionService {
    pub fn new(store: Arc<dyn PlayerStore>) -> Self {
        Self { store }
    }

    /// Removes one guess. Nothing matching is not an error.
    pub async fn delete_guess(
        &self,
        _admin: &AdminCapability,
        player_public_id: PublicId,
        room_id: &str,
        guess_id: GuessId,
    ) -> LedgerResult<MutationResult> {
        let result = self
            .store
            .delete_guess(player_public_id, room_id, GuessSelector::Id(guess_id))
            .await?;
        info!(
            "Admin deleted guess {} of player {} in room {} ({} removed)",
            guess_id, player_public_id, room_id, result.modified
        );
        Ok(result)
    }

    /// Flags every guess on `date` in the room
    pub async fn mark_cheat(
        &self,
        _admin: &AdminCapability,
        cheater_public_id: PublicId,
        room_id: &str,
        date: &str,
    ) -> LedgerResult<MutationResult> {
        if date.is_empty() {
            return Err(LedgerError::validation("game_date must not be empty"));
        }

        let patch = GuessPatch {
            cheat: Some(true),
            ..Default::default()
        };
        let result = self
            .store
            .mutate_guess(
                cheater_public_id,
                room_id,
                GuessSelector::Date(date.to_string()),
                patch,
            )
            .await?;
        info!(
            "Admin flagged {} guess(es) of player {} in room {} on {}",
            result.matched, cheater_public_id, room_id, date
        );
        Ok(result)
    }

    /// Moves a guess to another day. The new date may collide with an
    /// existing guess; that is allowed.
    pub async fn edit_date(
        &self,
        _admin: &AdminCapability,
        player_public_id: PublicId,
        room_id: &str,
        guess_id: GuessId,
        new_date: &str,
    ) -> LedgerResult<MutationResult> {
        if new_date.is_empty() {
            return Err(LedgerError::validation("new_date must not be empty"));
        }

        let patch = GuessPatch {
            date: Some(new_date.to_string()),
            ..Default::default()
        };
        let result = self
            .store
            .mutate_guess(player_public_id, room_id, GuessSelector::Id(guess_id), patch)
            .await?;
        info!(
            "Admin moved guess {} of player {} in room {} to {}",
            guess_id, player_public_id, room_id, new_date
        );
        Ok(result)
    }
}
