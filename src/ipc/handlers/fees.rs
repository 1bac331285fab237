use serde_json::json;

use crate::auth;
use crate::directory;
use crate::fees;
use crate::ipc::error::{domain_err, ok, require_db};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "fees.quote" => Some(handle_quote(state, req)),
        "fees.pay" => Some(handle_pay(state, req)),
        _ => None,
    }
}

/// The payment modal's breakdown for the record the session is bound to.
/// `feeStatus` rides along so the view can suppress the pay button on an
/// already-paid record.
fn handle_quote(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let roll = match auth::require_linked_roll(conn) {
        Ok(r) => r,
        Err(e) => return domain_err(&req.id, &e),
    };
    let student = match directory::get(conn, &roll) {
        Ok(s) => s,
        Err(e) => return domain_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "quote": fees::quote(&student),
            "feeStatus": student.fee_status,
        }),
    )
}

fn handle_pay(state: &mut AppState, req: &Request) -> serde_json::Value {
    let conn = match require_db(state, &req.id) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    let roll = match auth::require_linked_roll(conn) {
        Ok(r) => r,
        Err(e) => return domain_err(&req.id, &e),
    };
    match fees::pay(conn, &roll) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => {
            log::warn!("fees.pay rejected for {roll}: {e}");
            domain_err(&req.id, &e)
        }
    }
}
