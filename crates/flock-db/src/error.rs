use thiserror::Error;

/// Errors out of the store layer.
///
/// Constraint failures (duplicate username or email, duplicate follow edge,
/// dangling foreign key) are classified as [`DbError::Integrity`] so callers
/// can tell them apart from I/O failures. They propagate; nothing in this
/// workspace swallows them.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::Integrity(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            _ => DbError::Sqlite(err),
        }
    }
}
