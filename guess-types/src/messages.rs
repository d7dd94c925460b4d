use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GuessId, PublicId};

/// Clients send the attempt either as a JSON number or as a numeric string.
/// Non-integer numbers are kept as `Float` and rejected during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum AttemptValue {
    Number(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum SpeedValue {
    Number(f64),
    Text(String),
}

impl SpeedValue {
    pub fn into_text(self) -> String {
        match self {
            SpeedValue::Number(value) => value.to_string(),
            SpeedValue::Text(text) => text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitGuessRequest {
    pub private_id: String,
    pub alias: String,
    pub room_id: String,
    pub attempt: AttemptValue,
    pub found: bool,
    #[serde(default)]
    pub speed: Option<SpeedValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeNameRequest {
    pub private_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MergeRequest {
    pub private_id_to_merge: String,
    pub private_id_to_be_merged: String,
}

// Admin request bodies. The `admin_id` field is checked by the gate before
// these are decoded, so it is not part of the structs.

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteGuessRequest {
    pub player_public_id: PublicId,
    pub room_id: String,
    #[ts(type = "number")]
    pub guess_id: GuessId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarkCheatRequest {
    pub cheater_public_id: PublicId,
    pub room_id: String,
    pub game_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EditDateRequest {
    pub player_public_id: PublicId,
    pub room_id: String,
    #[ts(type = "number")]
    pub guess_id: GuessId,
    pub new_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum NameChange {
    Unchanged,
    Changed,
}

/// Outcome of an admin correction: rows the selector addressed and rows
/// that actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MutationResult {
    #[ts(type = "number")]
    pub matched: u64,
    #[ts(type = "number")]
    pub modified: u64,
}
