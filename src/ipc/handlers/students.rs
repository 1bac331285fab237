use serde_json::json;

use crate::auth;
use crate::directory;
use crate::error::DomainError;
use crate::ipc::error::{bad_params, domain_err, ok, require_db};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewStudent, Session, StudentPatch};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.add" => Some(handle_add(state, req)),
        "students.edit" => Some(handle_edit(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        "students.me" => Some(handle_me(state, req)),
        "students.updateMobile" => Some(handle_update_mobile(state, req)),
        _ => None,
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = auth::require_admin(conn) {
        return domain_err(&req.id, &e);
    }
    match directory::list(conn) {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = auth::require_admin(conn) {
        return domain_err(&req.id, &e);
    }
    let new: NewStudent = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, format!("invalid student fields: {e}")),
    };
    match directory::add_student(conn, new) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => {
            log::warn!("students.add rejected: {e}");
            domain_err(&req.id, &e)
        }
    }
}

fn handle_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = auth::require_admin(conn) {
        return domain_err(&req.id, &e);
    }
    let Some(roll) = req.params.get("roll").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing params.roll");
    };
    let patch: StudentPatch = match req
        .params
        .get("patch")
        .cloned()
        .ok_or("missing params.patch")
        .and_then(|v| serde_json::from_value(v).map_err(|_| "invalid params.patch"))
    {
        Ok(v) => v,
        Err(msg) => return bad_params(&req.id, msg),
    };
    match directory::edit_student(conn, roll, patch) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    if let Err(e) = auth::require_admin(conn) {
        return domain_err(&req.id, &e);
    }
    let Some(roll) = req.params.get("roll").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing params.roll");
    };
    match directory::delete_student(conn, roll) {
        Ok(()) => ok(&req.id, json!({ "deleted": roll })),
        Err(e) => domain_err(&req.id, &e),
    }
}

/// The profile the student/parent pages render: the record the current
/// session is bound to.
fn handle_me(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let roll = match auth::require_linked_roll(conn) {
        Ok(r) => r,
        Err(e) => return domain_err(&req.id, &e),
    };
    match directory::get(conn, &roll) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => domain_err(&req.id, &e),
    }
}

/// Students update their own contact mobile; the OTP step happens in the
/// view layer before this is called.
fn handle_update_mobile(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let session = match auth::require_session(conn) {
        Ok(s) => s,
        Err(e) => return domain_err(&req.id, &e),
    };
    let roll = match &session {
        Session::Student { roll } => roll.clone(),
        other => return domain_err(&req.id, &DomainError::Forbidden(other.role_name())),
    };
    let Some(mobile) = req.params.get("mobile").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing params.mobile");
    };
    match directory::update_mobile(conn, &roll, mobile) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => domain_err(&req.id, &e),
    }
}
