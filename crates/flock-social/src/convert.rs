//! Row-to-model conversion: TEXT uuids and timestamps out of SQLite into
//! the typed flock-types models.

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use flock_db::models::{FollowRow, MessageRow, UserRow};
use flock_types::{Follow, Message, User};

use crate::error::SocialError;

pub(crate) fn user_from_row(row: UserRow) -> Result<User, SocialError> {
    Ok(User {
        id: parse_id("user id", &row.id)?,
        username: row.username,
        email: row.email,
        image_url: row.image_url,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn message_from_row(row: MessageRow) -> Result<Message, SocialError> {
    Ok(Message {
        id: parse_id("message id", &row.id)?,
        user_id: parse_id("user id", &row.user_id)?,
        text: row.text,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

pub(crate) fn follow_from_row(row: FollowRow) -> Result<Follow, SocialError> {
    Ok(Follow {
        follower_id: parse_id("follower id", &row.follower_id)?,
        followed_id: parse_id("followed id", &row.followed_id)?,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn parse_id(field: &'static str, value: &str) -> Result<Uuid, SocialError> {
    value.parse().map_err(|_| SocialError::CorruptRow {
        field,
        value: value.to_string(),
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, SocialError> {
    // SQLite's datetime('now') is "YYYY-MM-DD HH:MM:SS" without a timezone.
    // Parse as naive UTC, falling back from the RFC 3339 form.
    value
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|_| SocialError::CorruptRow {
            field: "created_at",
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_timestamps_parse_as_utc() {
        let ts = parse_timestamp("2026-08-23 12:34:56").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-08-23T12:34:56+00:00");
    }

    #[test]
    fn garbage_timestamp_is_a_corrupt_row() {
        let err = parse_timestamp("not-a-date").unwrap_err();
        assert!(matches!(err, SocialError::CorruptRow { .. }));
    }
}
