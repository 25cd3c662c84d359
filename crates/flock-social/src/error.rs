use thiserror::Error;
use uuid::Uuid;

use flock_db::DbError;

#[derive(Debug, Error)]
pub enum SocialError {
    /// Store-layer failure. Integrity violations (duplicate username or
    /// email, duplicate follow edge) arrive here untouched.
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("corrupt {field} in stored row: {value:?}")]
    CorruptRow { field: &'static str, value: String },

    #[error("row {id} missing after insert")]
    MissingRow { id: Uuid },
}
