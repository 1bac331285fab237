use serde_json::json;

use crate::error::DomainError;
use crate::ipc::types::AppState;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Maps a typed domain failure onto its stable wire code. The view layer
/// branches on `error.code`, never on the message text.
pub fn domain_err(id: &str, e: &DomainError) -> serde_json::Value {
    err(id, e.code(), e.to_string(), None)
}

pub fn bad_params(id: &str, message: impl Into<String>) -> serde_json::Value {
    err(id, "bad_params", message, None)
}

/// Fetches the open workspace connection, or the error response every
/// data-touching handler returns before `workspace.select`.
pub fn require_db<'a>(
    state: &'a AppState,
    id: &str,
) -> Result<&'a rusqlite::Connection, serde_json::Value> {
    state
        .db
        .as_ref()
        .ok_or_else(|| err(id, "no_workspace", "no workspace selected", None))
}
