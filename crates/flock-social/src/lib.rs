//! Domain operations over the social store: accounts, the follow graph,
//! and per-user message timelines. The HTTP layer that consumes this crate
//! lives elsewhere.

pub mod accounts;
pub mod error;
pub mod graph;
pub mod timeline;

mod convert;

pub use error::SocialError;

use argon2::Argon2;
use flock_db::Database;

pub struct Social {
    db: Database,
    hasher: Argon2<'static>,
}

impl Social {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            hasher: Argon2::default(),
        }
    }

    /// Swap in a custom hasher. Tests pass minimum-cost Argon2 parameters
    /// here to keep signup fast; verification reads the parameters back out
    /// of the stored hash either way.
    pub fn with_hasher(db: Database, hasher: Argon2<'static>) -> Self {
        Self { db, hasher }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
