use thiserror::Error;

/// Checkable outcomes for every core operation. Handlers map each variant to
/// a stable IPC error code; the core itself never panics or aborts on a
/// domain failure.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("no student record matching {0}")]
    NotFound(String),

    #[error("roll number {0} already exists")]
    DuplicateRoll(String),

    #[error("invalid credentials")]
    BadCredentials,

    #[error("fees already paid for roll {0}")]
    AlreadyPaid(String),

    #[error("no active session")]
    NoSession,

    #[error("operation not permitted for role {0}")]
    Forbidden(&'static str),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "not_found",
            DomainError::DuplicateRoll(_) => "duplicate_roll",
            DomainError::BadCredentials => "bad_credentials",
            DomainError::AlreadyPaid(_) => "already_paid",
            DomainError::NoSession => "no_session",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::Storage(_) => "storage_failed",
        }
    }
}
