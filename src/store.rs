//! Whole-blob persistence for the dataset and the active session.
//!
//! Every mutation is a full read-modify-write cycle: load the dataset,
//! change it in memory, serialize the whole thing back. Within one sidecar
//! process that gives exactly one writer; across processes sharing a
//! workspace the last save wins. That is an accepted limitation of the
//! single-writer model, not something this layer papers over.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::model::{Session, Student, Ticket};

pub const DATASET_KEY: &str = "srms_db";
pub const SESSION_KEY: &str = "srms_user";

/// The aggregate root. Owns both collections; all mutation passes through
/// `load`/`save`. Tickets are kept most-recent-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub students: Vec<Student>,
    pub tickets: Vec<Ticket>,
}

/// Returns the persisted dataset. On first use the empty shape is written
/// back before returning, so a second load sees the same thing.
pub fn load(conn: &Connection) -> anyhow::Result<Dataset> {
    match db::kv_get(conn, DATASET_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => {
            let empty = Dataset::default();
            save(conn, &empty)?;
            Ok(empty)
        }
    }
}

pub fn save(conn: &Connection, data: &Dataset) -> anyhow::Result<()> {
    db::kv_set(conn, DATASET_KEY, &serde_json::to_string(data)?)
}

pub fn session(conn: &Connection) -> anyhow::Result<Option<Session>> {
    match db::kv_get(conn, SESSION_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn install_session(conn: &Connection, session: &Session) -> anyhow::Result<()> {
    db::kv_set(conn, SESSION_KEY, &serde_json::to_string(session)?)
}

pub fn clear_session(conn: &Connection) -> anyhow::Result<()> {
    db::kv_delete(conn, SESSION_KEY)
}
