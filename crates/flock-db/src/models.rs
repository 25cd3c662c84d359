//! Database row types, mapped straight off SQLite rows.
//!
//! Kept distinct from the flock-types API models so the store layer stays
//! free of uuid/chrono parsing; ids and timestamps are TEXT here.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub created_at: String,
}

pub struct FollowRow {
    pub follower_id: String,
    pub followed_id: String,
    pub created_at: String,
}
