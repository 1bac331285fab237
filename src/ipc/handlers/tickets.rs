use serde_json::json;

use crate::auth;
use crate::ipc::error::{bad_params, domain_err, ok, require_db};
use crate::ipc::types::{AppState, Request};
use crate::tickets;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tickets.file" => Some(handle_file(state, req)),
        "tickets.list" => Some(handle_list(state, req)),
        _ => None,
    }
}

fn handle_file(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let session = match auth::require_session(conn) {
        Ok(s) => s,
        Err(e) => return domain_err(&req.id, &e),
    };
    let Some(issue) = req.params.get("issue").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing params.issue");
    };
    match tickets::file(conn, &session, issue) {
        Ok(ticket) => ok(&req.id, json!({ "ticket": ticket })),
        Err(e) => {
            log::warn!("tickets.file rejected: {e}");
            domain_err(&req.id, &e)
        }
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = auth::require_session(conn) {
        return domain_err(&req.id, &e);
    }
    match tickets::list_all(conn) {
        Ok(all) => ok(&req.id, json!({ "tickets": all })),
        Err(e) => domain_err(&req.id, &e),
    }
}
