use serde::Deserialize;

// -- Signup --

/// Signup input. The password arrives in plaintext and is hashed before it
/// touches the database.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: Option<String>,
}
