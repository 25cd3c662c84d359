use argon2::password_hash::{Error as PasswordHashError, SaltString, rand_core::OsRng};
use argon2::{PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::debug;
use uuid::Uuid;

use flock_types::{NewUser, User};

use crate::Social;
use crate::convert::user_from_row;
use crate::error::SocialError;

impl Social {
    /// Create a user with an Argon2id-hashed password and read the stored
    /// record back. A duplicate username or email surfaces as
    /// `SocialError::Db(DbError::Integrity)`; callers decide how to report it.
    pub fn signup(&self, new_user: NewUser) -> Result<User, SocialError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(SocialError::Hash)?
            .to_string();

        let id = Uuid::new_v4();
        self.db().create_user(
            &id.to_string(),
            &new_user.username,
            &new_user.email,
            &password_hash,
            new_user.image_url.as_deref(),
        )?;

        debug!("signed up {} ({})", new_user.username, id);

        let row = self
            .db()
            .get_user_by_id(&id.to_string())?
            .ok_or(SocialError::MissingRow { id })?;
        user_from_row(row)
    }

    /// Look up `username` and verify `password` against the stored hash.
    /// Wrong username and wrong password both collapse to `Ok(None)`.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, SocialError> {
        let Some(row) = self.db().get_user_by_username(username)? else {
            return Ok(None);
        };

        let parsed_hash = PasswordHash::new(&row.password).map_err(SocialError::Hash)?;

        match self
            .hasher
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(Some(user_from_row(row)?)),
            Err(PasswordHashError::Password) => Ok(None),
            Err(e) => Err(SocialError::Hash(e)),
        }
    }

    pub fn user(&self, id: Uuid) -> Result<Option<User>, SocialError> {
        match self.db().get_user_by_id(&id.to_string())? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn user_count(&self) -> Result<i64, SocialError> {
        Ok(self.db().user_count()?)
    }

    /// Delete a user; their messages and follow edges cascade with them.
    /// Returns whether the user existed.
    pub fn delete_user(&self, id: Uuid) -> Result<bool, SocialError> {
        Ok(self.db().delete_user(&id.to_string())?)
    }

    /// Bulk delete of every user, as test setup does.
    pub fn delete_all_users(&self) -> Result<usize, SocialError> {
        Ok(self.db().delete_all_users()?)
    }
}
