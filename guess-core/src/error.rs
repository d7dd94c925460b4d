use guess_types::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{reason}")]
    Validation { reason: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("already played today")]
    DuplicateSubmission,

    #[error("admin credential missing or invalid")]
    AdminDenied,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Backend failure or timeout. The message is for logs, not for clients.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("store call timed out after {millis}ms")]
    Timeout { millis: u64 },
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn validation(reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            reason: reason.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        LedgerError::NotFound { what: what.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation { .. } => ErrorKind::Validation,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::DuplicateSubmission => ErrorKind::DuplicateSubmission,
            LedgerError::AdminDenied => ErrorKind::AdminDenied,
            LedgerError::Store(_) => ErrorKind::Store,
        }
    }
}
