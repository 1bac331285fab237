use chrono::Utc;
use rusqlite::Connection;

use crate::error::DomainError;
use crate::model::{NewStudent, Student, StudentPatch};
use crate::store::{self, Dataset};

/// First match in insertion order. Roll numbers are unique by construction
/// (`add_student` rejects duplicates), so at most one record can match.
pub fn find_by_roll<'a>(data: &'a Dataset, roll: &str) -> Option<&'a Student> {
    data.students.iter().find(|s| s.roll == roll)
}

/// First match in insertion order. Parent-mobile uniqueness is NOT enforced;
/// if two students share a `p_mobile`, the earlier-added record wins. That
/// first-match policy is deliberate and relied on by the parent login.
pub fn find_by_parent_mobile<'a>(data: &'a Dataset, mobile: &str) -> Option<&'a Student> {
    data.students.iter().find(|s| s.p_mobile == mobile)
}

pub fn list(conn: &Connection) -> Result<Vec<Student>, DomainError> {
    Ok(store::load(conn)?.students)
}

pub fn get(conn: &Connection, roll: &str) -> Result<Student, DomainError> {
    let data = store::load(conn)?;
    find_by_roll(&data, roll)
        .cloned()
        .ok_or_else(|| DomainError::NotFound(roll.to_string()))
}

/// Appends a new record with the fixed defaults for the fields the add form
/// does not collect. Rejects an existing roll without touching the dataset.
pub fn add_student(conn: &Connection, new: NewStudent) -> Result<Student, DomainError> {
    let mut data = store::load(conn)?;
    if find_by_roll(&data, &new.roll).is_some() {
        return Err(DomainError::DuplicateRoll(new.roll));
    }
    let student = new.into_student(&Utc::now().to_rfc3339());
    data.students.push(student.clone());
    store::save(conn, &data)?;
    Ok(student)
}

/// Overwrites the editable fields only. Identity (`roll`), the student-owned
/// `mobile`, the payment state, and the defaulted fields all survive an edit
/// unchanged.
pub fn edit_student(
    conn: &Connection,
    roll: &str,
    patch: StudentPatch,
) -> Result<Student, DomainError> {
    let mut data = store::load(conn)?;
    let student = data
        .students
        .iter_mut()
        .find(|s| s.roll == roll)
        .ok_or_else(|| DomainError::NotFound(roll.to_string()))?;

    student.name = patch.name;
    student.dob = patch.dob;
    student.p_mobile = patch.p_mobile;
    student.branch = patch.branch;
    student.section = patch.section;
    student.fees = patch.fees;
    student.cgpa = patch.cgpa;
    student.touch(&Utc::now().to_rfc3339());

    let updated = student.clone();
    store::save(conn, &data)?;
    Ok(updated)
}

/// Changes the contact mobile and nothing else. Verification of the new
/// number (OTP or otherwise) is the caller's business.
pub fn update_mobile(
    conn: &Connection,
    roll: &str,
    new_mobile: &str,
) -> Result<Student, DomainError> {
    let mut data = store::load(conn)?;
    let student = data
        .students
        .iter_mut()
        .find(|s| s.roll == roll)
        .ok_or_else(|| DomainError::NotFound(roll.to_string()))?;

    student.mobile = new_mobile.to_string();
    student.touch(&Utc::now().to_rfc3339());

    let updated = student.clone();
    store::save(conn, &data)?;
    Ok(updated)
}

/// Removes exactly the matching record. An unknown roll is a typed error,
/// not a silent no-op.
pub fn delete_student(conn: &Connection, roll: &str) -> Result<(), DomainError> {
    let mut data = store::load(conn)?;
    let before = data.students.len();
    data.students.retain(|s| s.roll != roll);
    if data.students.len() == before {
        return Err(DomainError::NotFound(roll.to_string()));
    }
    store::save(conn, &data)?;
    Ok(())
}
