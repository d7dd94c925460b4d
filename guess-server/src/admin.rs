use guess_core::{AdminCapability, AdminGate, LedgerError, LedgerResult};
use serde_json::Value;

/// Checks the `admin_id` field of a request body before the body is decoded.
/// Missing is denied, a non-string value is malformed input.
pub fn authorize(gate: &AdminGate, body: &Value) -> LedgerResult<AdminCapability> {
    match body.get("admin_id") {
        None | Some(Value::Null) => gate.verify(None),
        Some(Value::String(admin_id)) => gate.verify(Some(admin_id)),
        Some(_) => Err(LedgerError::validation("Invalid arguments")),
    }
}
