use serde::{Deserialize, Serialize};

/// One-way fee state. `Pending -> Paid` is the only transition; nothing ever
/// moves a record back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    Pending,
    Paid,
}

/// A student record. `roll` is the identity: unique across the dataset and
/// immutable after creation. `dob` (YYYY-MM-DD) doubles as the password for
/// both the student and parent logins. Field values are kept as the strings
/// the admin entered; `fees` is parsed only when quoting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub roll: String,
    pub name: String,
    pub dob: String,
    pub mobile: String,
    pub p_mobile: String,
    pub branch: String,
    pub section: String,
    pub sem: String,
    pub degree: String,
    pub cgpa: String,
    pub club: String,
    pub father: String,
    pub mother: String,
    pub fees: String,
    pub fee_status: FeeStatus,
    pub attendance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Student {
    pub fn touch(&mut self, now: &str) {
        self.updated_at = Some(now.to_string());
    }
}

/// Caller-supplied fields for `students.add`. Everything else is defaulted by
/// the directory (see `NewStudent::into_student`).
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub roll: String,
    pub dob: String,
    pub p_mobile: String,
    pub branch: String,
    pub section: String,
    pub fees: String,
    pub cgpa: String,
}

impl NewStudent {
    pub fn into_student(self, now: &str) -> Student {
        Student {
            roll: self.roll,
            name: self.name,
            dob: self.dob,
            mobile: "0000000000".to_string(),
            p_mobile: self.p_mobile,
            branch: self.branch,
            section: self.section,
            sem: "1".to_string(),
            degree: "B.Tech".to_string(),
            cgpa: self.cgpa,
            club: "None".to_string(),
            father: "-".to_string(),
            mother: "-".to_string(),
            fees: self.fees,
            fee_status: FeeStatus::Pending,
            attendance: "85%".to_string(),
            updated_at: Some(now.to_string()),
        }
    }
}

/// The admin-editable subset of a student record. `roll`, `mobile`,
/// `fee_status` and the defaulted fields are never touched by an edit.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentPatch {
    pub name: String,
    pub dob: String,
    pub p_mobile: String,
    pub branch: String,
    pub section: String,
    pub fees: String,
    pub cgpa: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketKind {
    Student,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Closed,
}

/// A support ticket. Append-only: nothing in the core mutates or deletes a
/// ticket once filed, and no close transition exists. `id` is an
/// epoch-millisecond stamp, bumped when the clock has not advanced so ids
/// stay unique (see `tickets::next_ticket_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TicketKind,
    pub roll: String,
    pub issue: String,
    pub status: TicketStatus,
}

/// The single active session, persisted whole under its own key. Serializes
/// as `{"role":"student","roll":...}` / `{"role":"parent","child_roll":...}`
/// / `{"role":"admin"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Session {
    Admin,
    Student { roll: String },
    Parent { child_roll: String },
}

impl Session {
    pub fn role_name(&self) -> &'static str {
        match self {
            Session::Admin => "admin",
            Session::Student { .. } => "student",
            Session::Parent { .. } => "parent",
        }
    }

    /// The student record this session is bound to: the student's own roll,
    /// or the child's roll for a parent. Admin sessions bind to no record.
    pub fn linked_roll(&self) -> Option<&str> {
        match self {
            Session::Admin => None,
            Session::Student { roll } => Some(roll),
            Session::Parent { child_roll } => Some(child_roll),
        }
    }
}
