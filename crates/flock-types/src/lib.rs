pub mod api;
pub mod models;

pub use api::NewUser;
pub use models::{Follow, Message, User};
