use uuid::Uuid;

use flock_types::{Message, User};

use crate::Social;
use crate::convert::message_from_row;
use crate::error::SocialError;

impl Social {
    /// Attach a message to `user` and read the stored record back.
    ///
    /// `text` is stored as-is; whether empty messages should be rejected is
    /// an open question upstream, so no emptiness check is made here.
    pub fn post_message(&self, user: &User, text: &str) -> Result<Message, SocialError> {
        let id = Uuid::new_v4();
        self.db()
            .insert_message(&id.to_string(), &user.id.to_string(), text)?;

        let row = self
            .db()
            .get_message(&id.to_string())?
            .ok_or(SocialError::MissingRow { id })?;
        message_from_row(row)
    }

    /// `user`'s messages, newest first.
    pub fn messages(&self, user: &User) -> Result<Vec<Message>, SocialError> {
        self.db()
            .messages_for_user(&user.id.to_string())?
            .into_iter()
            .map(message_from_row)
            .collect()
    }

    pub fn message_count(&self, user: &User) -> Result<i64, SocialError> {
        Ok(self.db().message_count(&user.id.to_string())?)
    }
}
