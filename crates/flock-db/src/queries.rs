use rusqlite::Connection;

use crate::Database;
use crate::error::DbError;
use crate::models::{FollowRow, MessageRow, UserRow};

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
        image_url: Option<&str>,
    ) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, username, email, password_hash, image_url],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn user_count(&self) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Delete one user. Messages and follow edges go with it via
    /// ON DELETE CASCADE. Returns whether a row was deleted.
    pub fn delete_user(&self, id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    /// Bulk delete of every user, as test setup does. Returns the number of
    /// users removed; dependent rows cascade.
    pub fn delete_all_users(&self) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM users", [])?;
            Ok(deleted)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, id: &str, user_id: &str, text: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, user_id, text) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, user_id, text],
            )?;
            Ok(())
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, text, created_at FROM messages WHERE id = ?1",
            )?;
            stmt.query_row([id], message_from_row).optional()
        })
    }

    pub fn messages_for_user(&self, user_id: &str) -> Result<Vec<MessageRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, text, created_at FROM messages
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id",
            )?;

            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn message_count(&self, user_id: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // -- Follows --

    /// Insert a follow edge. The pair is the primary key, so following the
    /// same user twice is an integrity violation, as is following with a
    /// dangling user id.
    pub fn insert_follow(&self, follower_id: &str, followed_id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                rusqlite::params![follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    /// Remove a follow edge if present. Returns whether one was removed.
    pub fn delete_follow(&self, follower_id: &str, followed_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                rusqlite::params![follower_id, followed_id],
            )?;
            Ok(deleted > 0)
        })
    }

    pub fn get_follow(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> Result<Option<FollowRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT follower_id, followed_id, created_at FROM follows
                 WHERE follower_id = ?1 AND followed_id = ?2",
            )?;
            stmt.query_row(rusqlite::params![follower_id, followed_id], |row| {
                Ok(FollowRow {
                    follower_id: row.get(0)?,
                    followed_id: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()
        })
    }

    pub fn follow_exists(&self, follower_id: &str, followed_id: &str) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let exists = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2
                 )",
                rusqlite::params![follower_id, followed_id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Users `user_id` follows, oldest edge first.
    pub fn following(&self, user_id: &str) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM follows f
                 JOIN users u ON u.id = f.followed_id
                 WHERE f.follower_id = ?1
                 ORDER BY f.created_at, u.username",
            )?;

            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Users following `user_id`, oldest edge first.
    pub fn followers(&self, user_id: &str) -> Result<Vec<UserRow>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.email, u.password, u.image_url, u.created_at
                 FROM follows f
                 JOIN users u ON u.id = f.follower_id
                 WHERE f.followed_id = ?1
                 ORDER BY f.created_at, u.username",
            )?;

            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn following_count(&self, user_id: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE follower_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    pub fn followers_count(&self, user_id: &str) -> Result<i64, DbError> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM follows WHERE followed_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, image_url, created_at
         FROM users WHERE id = ?1",
    )?;

    stmt.query_row([id], user_from_row).optional()
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password, image_url, created_at
         FROM users WHERE username = ?1",
    )?;

    stmt.query_row([username], user_from_row).optional()
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, DbError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, DbError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn add_user(db: &Database, id: &str, username: &str, email: &str) {
        db.create_user(id, username, email, "hash", None).unwrap();
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");

        let err = db
            .create_user("b", "u1", "u2@email.com", "hash", None)
            .unwrap_err();
        assert!(matches!(err, DbError::Integrity(_)));
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");

        let err = db
            .create_user("b", "u2", "u1@email.com", "hash", None)
            .unwrap_err();
        assert!(matches!(err, DbError::Integrity(_)));
    }

    #[test]
    fn missing_user_reads_as_none() {
        let db = db();

        assert!(db.get_user_by_id("nope").unwrap().is_none());
        assert!(db.get_user_by_username("nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_follow_edge_is_rejected() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");
        add_user(&db, "b", "u2", "u2@email.com");

        db.insert_follow("a", "b").unwrap();
        let err = db.insert_follow("a", "b").unwrap_err();
        assert!(matches!(err, DbError::Integrity(_)));
    }

    #[test]
    fn follow_edge_requires_existing_users() {
        let db = db();

        let err = db.insert_follow("ghost1", "ghost2").unwrap_err();
        assert!(matches!(err, DbError::Integrity(_)));
    }

    #[test]
    fn message_requires_an_existing_user() {
        let db = db();

        let err = db.insert_message("m1", "ghost", "hi").unwrap_err();
        assert!(matches!(err, DbError::Integrity(_)));
    }

    #[test]
    fn follow_listing_and_counts() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");
        add_user(&db, "b", "u2", "u2@email.com");
        add_user(&db, "c", "u3", "u3@email.com");

        db.insert_follow("a", "b").unwrap();
        db.insert_follow("a", "c").unwrap();

        assert_eq!(db.following_count("a").unwrap(), 2);
        assert_eq!(db.followers_count("b").unwrap(), 1);
        assert!(db.follow_exists("a", "b").unwrap());
        assert!(!db.follow_exists("b", "a").unwrap());

        let following: Vec<String> = db
            .following("a")
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(following, vec!["u2", "u3"]);

        let followers: Vec<String> = db
            .followers("b")
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(followers, vec!["u1"]);

        assert!(db.delete_follow("a", "b").unwrap());
        assert!(!db.delete_follow("a", "b").unwrap());
        assert_eq!(db.following_count("a").unwrap(), 1);
    }

    #[test]
    fn deleting_a_user_cascades() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");
        add_user(&db, "b", "u2", "u2@email.com");

        db.insert_message("m1", "a", "hi").unwrap();
        db.insert_follow("a", "b").unwrap();
        db.insert_follow("b", "a").unwrap();

        assert!(db.delete_user("a").unwrap());
        assert!(!db.delete_user("a").unwrap());

        assert_eq!(db.message_count("a").unwrap(), 0);
        assert!(!db.follow_exists("a", "b").unwrap());
        assert!(!db.follow_exists("b", "a").unwrap());
        assert_eq!(db.following_count("b").unwrap(), 0);
    }

    #[test]
    fn delete_all_users_cascades_everywhere() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");
        add_user(&db, "b", "u2", "u2@email.com");

        db.insert_message("m1", "a", "hi").unwrap();
        db.insert_follow("a", "b").unwrap();

        assert_eq!(db.delete_all_users().unwrap(), 2);
        assert_eq!(db.user_count().unwrap(), 0);
        assert!(db.get_message("m1").unwrap().is_none());
        assert!(db.get_follow("a", "b").unwrap().is_none());
    }

    #[test]
    fn messages_round_trip_through_the_store() {
        let db = db();
        add_user(&db, "a", "u1", "u1@email.com");

        db.insert_message("m1", "a", "first").unwrap();
        db.insert_message("m2", "a", "second").unwrap();

        assert_eq!(db.message_count("a").unwrap(), 2);

        let stored = db.get_message("m1").unwrap().unwrap();
        assert_eq!(stored.user_id, "a");
        assert_eq!(stored.text, "first");

        let texts: Vec<String> = db
            .messages_for_user("a")
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"first".to_string()));
        assert!(texts.contains(&"second".to_string()));
    }
}
