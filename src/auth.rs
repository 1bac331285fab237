use rusqlite::Connection;
use serde::Deserialize;

use crate::directory;
use crate::error::DomainError;
use crate::model::Session;
use crate::store;

/// Fixed admin credential. No admin record exists in the dataset; the admin
/// role is a static identity.
pub const ADMIN_ID: &str = "90632";
pub const ADMIN_PASS: &str = "180406";

/// Login parameters, tagged by role. Students authenticate by roll number,
/// parents by the registered parent mobile; both use the student's date of
/// birth as the password (exact string match, YYYY-MM-DD).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", content = "credentials", rename_all = "lowercase")]
pub enum LoginRequest {
    Admin { id: String, pass: String },
    Student { roll: String, pass: String },
    Parent { mobile: String, pass: String },
}

/// Validates the credential for the requested role and installs the session
/// on success. Reads the dataset, never mutates it.
pub fn login(conn: &Connection, req: &LoginRequest) -> Result<Session, DomainError> {
    let session = match req {
        LoginRequest::Admin { id, pass } => {
            if id != ADMIN_ID || pass != ADMIN_PASS {
                return Err(DomainError::BadCredentials);
            }
            Session::Admin
        }
        LoginRequest::Student { roll, pass } => {
            let data = store::load(conn)?;
            let student = directory::find_by_roll(&data, roll)
                .ok_or_else(|| DomainError::NotFound(roll.clone()))?;
            if *pass != student.dob {
                return Err(DomainError::BadCredentials);
            }
            Session::Student {
                roll: student.roll.clone(),
            }
        }
        LoginRequest::Parent { mobile, pass } => {
            let data = store::load(conn)?;
            let student = directory::find_by_parent_mobile(&data, mobile)
                .ok_or_else(|| DomainError::NotFound(mobile.clone()))?;
            if *pass != student.dob {
                return Err(DomainError::BadCredentials);
            }
            Session::Parent {
                child_roll: student.roll.clone(),
            }
        }
    };
    store::install_session(conn, &session)?;
    Ok(session)
}

pub fn logout(conn: &Connection) -> Result<(), DomainError> {
    store::clear_session(conn)?;
    Ok(())
}

pub fn current_session(conn: &Connection) -> Result<Option<Session>, DomainError> {
    Ok(store::session(conn)?)
}

/// Every gated operation starts here: no session means the caller was never
/// authenticated (or logged out).
pub fn require_session(conn: &Connection) -> Result<Session, DomainError> {
    store::session(conn)?.ok_or(DomainError::NoSession)
}

pub fn require_admin(conn: &Connection) -> Result<(), DomainError> {
    match require_session(conn)? {
        Session::Admin => Ok(()),
        other => Err(DomainError::Forbidden(other.role_name())),
    }
}

/// Resolves the student record a student/parent session is bound to.
/// Admin sessions carry no linked record.
pub fn require_linked_roll(conn: &Connection) -> Result<String, DomainError> {
    let session = require_session(conn)?;
    match session.linked_roll() {
        Some(roll) => Ok(roll.to_string()),
        None => Err(DomainError::Forbidden(session.role_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::NewStudent;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        db::init_schema(&conn).expect("init schema");
        directory::add_student(
            &conn,
            NewStudent {
                name: "Asha Rao".to_string(),
                roll: "21CS101".to_string(),
                dob: "2003-05-01".to_string(),
                p_mobile: "9876543210".to_string(),
                branch: "CSE".to_string(),
                section: "A".to_string(),
                fees: "45000".to_string(),
                cgpa: "8.9".to_string(),
            },
        )
        .expect("seed student");
        conn
    }

    #[test]
    fn admin_login_is_constant_checked() {
        let conn = seeded_conn();
        let ok = login(
            &conn,
            &LoginRequest::Admin {
                id: ADMIN_ID.to_string(),
                pass: ADMIN_PASS.to_string(),
            },
        )
        .expect("admin login");
        assert_eq!(ok, Session::Admin);

        let bad = login(
            &conn,
            &LoginRequest::Admin {
                id: ADMIN_ID.to_string(),
                pass: "000000".to_string(),
            },
        );
        assert!(matches!(bad, Err(DomainError::BadCredentials)));
    }

    #[test]
    fn student_login_matches_dob_exactly() {
        let conn = seeded_conn();
        let bad = login(
            &conn,
            &LoginRequest::Student {
                roll: "21CS101".to_string(),
                pass: "2003-05-02".to_string(),
            },
        );
        assert!(matches!(bad, Err(DomainError::BadCredentials)));
        // Failed login must not install a session.
        assert!(current_session(&conn).expect("session read").is_none());

        let session = login(
            &conn,
            &LoginRequest::Student {
                roll: "21CS101".to_string(),
                pass: "2003-05-01".to_string(),
            },
        )
        .expect("student login");
        assert_eq!(
            session,
            Session::Student {
                roll: "21CS101".to_string()
            }
        );
        assert_eq!(
            current_session(&conn).expect("session read"),
            Some(session)
        );
    }

    #[test]
    fn unknown_roll_and_unknown_parent_mobile_are_not_found() {
        let conn = seeded_conn();
        let missing = login(
            &conn,
            &LoginRequest::Student {
                roll: "nope".to_string(),
                pass: "2003-05-01".to_string(),
            },
        );
        assert!(matches!(missing, Err(DomainError::NotFound(_))));

        let missing = login(
            &conn,
            &LoginRequest::Parent {
                mobile: "0000000001".to_string(),
                pass: "2003-05-01".to_string(),
            },
        );
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn parent_login_binds_child_roll() {
        let conn = seeded_conn();
        let session = login(
            &conn,
            &LoginRequest::Parent {
                mobile: "9876543210".to_string(),
                pass: "2003-05-01".to_string(),
            },
        )
        .expect("parent login");
        assert_eq!(
            session,
            Session::Parent {
                child_roll: "21CS101".to_string()
            }
        );
    }

    #[test]
    fn logout_clears_the_session_and_gates_close() {
        let conn = seeded_conn();
        login(
            &conn,
            &LoginRequest::Admin {
                id: ADMIN_ID.to_string(),
                pass: ADMIN_PASS.to_string(),
            },
        )
        .expect("admin login");
        logout(&conn).expect("logout");
        assert!(matches!(
            require_session(&conn),
            Err(DomainError::NoSession)
        ));
    }
}
