use chrono::Utc;
use rusqlite::Connection;

use crate::error::DomainError;
use crate::model::{Session, Ticket, TicketKind, TicketStatus};
use crate::store::{self, Dataset};

/// Files a support ticket for the record the session is bound to and
/// prepends it to the queue. Most-recent-first ordering is part of the
/// contract, not a display choice. Admin sessions cannot file tickets.
pub fn file(conn: &Connection, session: &Session, issue: &str) -> Result<Ticket, DomainError> {
    let (kind, roll) = match session {
        Session::Student { roll } => (TicketKind::Student, roll.clone()),
        Session::Parent { child_roll } => (TicketKind::Parent, child_roll.clone()),
        Session::Admin => return Err(DomainError::Forbidden("admin")),
    };

    let mut data = store::load(conn)?;
    let ticket = Ticket {
        id: next_ticket_id(&data, Utc::now().timestamp_millis()),
        kind,
        roll,
        issue: issue.to_string(),
        status: TicketStatus::Open,
    };
    data.tickets.insert(0, ticket.clone());
    store::save(conn, &data)?;
    Ok(ticket)
}

/// Stored order: most recent first.
pub fn list_all(conn: &Connection) -> Result<Vec<Ticket>, DomainError> {
    Ok(store::load(conn)?.tickets)
}

/// Epoch milliseconds, bumped past the newest existing id when the clock has
/// not advanced. The newest ticket sits at the front, so one comparison is
/// enough to keep ids unique and strictly decreasing down the queue.
fn next_ticket_id(data: &Dataset, now_ms: i64) -> i64 {
    match data.tickets.first() {
        Some(newest) if newest.id >= now_ms => newest.id + 1,
        _ => now_ms,
    }
}
