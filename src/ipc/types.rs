use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

/// One request line from the view layer: `{id, method, params}`.
#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Sidecar state. `db` is absent until the caller selects a workspace;
/// every data-touching method gates on it.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            workspace: None,
            db: None,
        }
    }
}
