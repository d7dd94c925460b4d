use std::ops::RangeInclusive;
use std::sync::Arc;

use guess_types::{AttemptValue, RoomStanding, SubmitGuessRequest};
use tracing::{debug, info};

use crate::{GameClock, LedgerError, LedgerResult, NewGuess, PlayerStore, room_index};

pub const ATTEMPT_RANGE: RangeInclusive<i64> = 1..=6;

/// Integer value of the attempt field. Range is checked separately.
pub fn parse_attempt(attempt: &AttemptValue) -> LedgerResult<i64> {
    match attempt {
        AttemptValue::Number(value) => Ok(*value),
        AttemptValue::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            Ok(*value as i64)
        }
        AttemptValue::Float(_) => Err(LedgerError::validation("Invalid arguments")),
        AttemptValue::Text(text) => text
            .parse::<i64>()
            .map_err(|_| LedgerError::validation("Invalid arguments")),
    }
}

pub fn check_attempt_range(attempt: i64) -> LedgerResult<u8> {
    if !ATTEMPT_RANGE.contains(&attempt) {
        return Err(LedgerError::validation(format!(
            "attempt must be between {} and {}",
            ATTEMPT_RANGE.start(),
            ATTEMPT_RANGE.end()
        )));
    }
    Ok(attempt as u8)
}

/// Applies the daily submission rules and records the guess
pub struct GuessSubmissionService {
    store: Arc<dyn PlayerStore>,
    clock: Arc<dyn GameClock>,
}

impl GuessSubmissionService {
    pub fn new(store: Arc<dyn PlayerStore>, clock: Arc<dyn GameClock>) -> Self {
        Self { store, clock }
    }

    pub async fn submit(&self, request: SubmitGuessRequest) -> LedgerResult<RoomStanding> {
        let SubmitGuessRequest {
            private_id,
            alias,
            room_id,
            attempt,
            found,
            speed,
        } = request;

        // Out-of-range attempts are rejected before any store access
        let attempt = check_attempt_range(parse_attempt(&attempt)?)?;

        let player = self
            .store
            .find_by_private_id(&private_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Player"))?;

        // Alias follows the most recent submission
        if player.name != alias {
            self.store.update_name(&private_id, &alias).await?;
            debug!("Player {} alias updated to {:?}", player.public_id, alias);
        }

        if !room_index::contains_room(&player.rooms, &room_id) {
            self.store.push_room(&private_id, &room_id).await?;
            debug!("Player {} joined room {}", player.public_id, room_id);
        }

        let today = self.clock.today_string();
        if self
            .store
            .find_player_with_room_guess_on_date(&private_id, &room_id, &today)
            .await?
            .is_some()
        {
            return Err(LedgerError::DuplicateSubmission);
        }

        let guess = NewGuess {
            attempt,
            found,
            date: today.clone(),
            alias,
            speed: speed.map(|speed| speed.into_text()),
            cheat: false,
        };
        self.store.append_guess(&private_id, &room_id, guess).await?;
        info!(
            "Player {} recorded attempt {} (found: {}) in room {} on {}",
            player.public_id, attempt, found, room_id, today
        );

        self.store
            .find_player_with_room(&private_id, &room_id)
            .await?
            .and_then(|player| player.into_standing())
            .ok_or_else(|| LedgerError::not_found("Room"))
    }
}
