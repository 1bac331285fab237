use serde_json::json;

use crate::auth::{self, LoginRequest};
use crate::ipc::error::{bad_params, domain_err, ok, require_db};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.session" => Some(handle_session(state, req)),
        _ => None,
    }
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let login_req: LoginRequest = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, format!("invalid login params: {e}")),
    };

    match auth::login(conn, &login_req) {
        Ok(session) => {
            log::info!("login ok: role={}", session.role_name());
            ok(&req.id, json!({ "session": session }))
        }
        Err(e) => {
            log::warn!("login rejected: {e}");
            domain_err(&req.id, &e)
        }
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match auth::logout(conn) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match auth::current_session(conn) {
        Ok(session) => ok(&req.id, json!({ "session": session })),
        Err(e) => domain_err(&req.id, &e),
    }
}
