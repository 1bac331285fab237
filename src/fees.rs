use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::DomainError;
use crate::model::{FeeStatus, Student};
use crate::store;

/// Charged when a record has no parseable base fee.
pub const DEFAULT_BASE_FEE: i64 = 45000;
pub const GST_RATE: f64 = 0.18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub base: i64,
    pub gst: i64,
    pub total: i64,
}

/// Derives the payable amount from the record. Pure: an unparseable or blank
/// `fees` value falls back to the default base, GST is rounded to the nearest
/// rupee.
pub fn quote(student: &Student) -> FeeQuote {
    let base = student
        .fees
        .trim()
        .parse::<i64>()
        .unwrap_or(DEFAULT_BASE_FEE);
    let gst = (base as f64 * GST_RATE).round() as i64;
    FeeQuote {
        base,
        gst,
        total: base + gst,
    }
}

/// One-way transition `Pending -> Paid`. Calling it on an already-paid
/// record is a typed error and leaves the record untouched; nothing ever
/// reverts the status.
pub fn pay(conn: &Connection, roll: &str) -> Result<Student, DomainError> {
    let mut data = store::load(conn)?;
    let student = data
        .students
        .iter_mut()
        .find(|s| s.roll == roll)
        .ok_or_else(|| DomainError::NotFound(roll.to_string()))?;

    if student.fee_status == FeeStatus::Paid {
        return Err(DomainError::AlreadyPaid(roll.to_string()));
    }
    student.fee_status = FeeStatus::Paid;
    student.touch(&Utc::now().to_rfc3339());

    let updated = student.clone();
    store::save(conn, &data)?;
    Ok(updated)
}
