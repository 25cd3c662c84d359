use tracing::debug;

use flock_types::{Follow, User};

use crate::Social;
use crate::convert::{follow_from_row, user_from_row};
use crate::error::SocialError;

impl Social {
    /// Record that `follower` follows `followed` and read the stored edge
    /// back. The pair is the primary key, so repeating a follow is an
    /// integrity violation rather than a silent no-op. Self-follows are not
    /// constrained.
    pub fn follow(&self, follower: &User, followed: &User) -> Result<Follow, SocialError> {
        let follower_id = follower.id.to_string();
        let followed_id = followed.id.to_string();

        self.db().insert_follow(&follower_id, &followed_id)?;
        debug!("{} now follows {}", follower.username, followed.username);

        let row = self
            .db()
            .get_follow(&follower_id, &followed_id)?
            .ok_or(SocialError::MissingRow { id: follower.id })?;
        follow_from_row(row)
    }

    /// Remove the edge if present. Returns whether one was removed.
    pub fn unfollow(&self, follower: &User, followed: &User) -> Result<bool, SocialError> {
        let removed = self
            .db()
            .delete_follow(&follower.id.to_string(), &followed.id.to_string())?;
        if removed {
            debug!("{} unfollowed {}", follower.username, followed.username);
        }
        Ok(removed)
    }

    /// Membership test over `user`'s outgoing edges. No side effects.
    pub fn is_following(&self, user: &User, other: &User) -> Result<bool, SocialError> {
        Ok(self
            .db()
            .follow_exists(&user.id.to_string(), &other.id.to_string())?)
    }

    /// Membership test over `user`'s incoming edges. No side effects.
    pub fn is_followed_by(&self, user: &User, other: &User) -> Result<bool, SocialError> {
        Ok(self
            .db()
            .follow_exists(&other.id.to_string(), &user.id.to_string())?)
    }

    /// Users `user` follows, oldest edge first.
    pub fn following(&self, user: &User) -> Result<Vec<User>, SocialError> {
        self.db()
            .following(&user.id.to_string())?
            .into_iter()
            .map(user_from_row)
            .collect()
    }

    /// Users following `user`, oldest edge first.
    pub fn followers(&self, user: &User) -> Result<Vec<User>, SocialError> {
        self.db()
            .followers(&user.id.to_string())?
            .into_iter()
            .map(user_from_row)
            .collect()
    }

    pub fn following_count(&self, user: &User) -> Result<i64, SocialError> {
        Ok(self.db().following_count(&user.id.to_string())?)
    }

    pub fn followers_count(&self, user: &User) -> Result<i64, SocialError> {
        Ok(self.db().followers_count(&user.id.to_string())?)
    }
}
