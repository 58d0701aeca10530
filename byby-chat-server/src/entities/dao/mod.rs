pub mod chat;
pub mod user;

pub use chat::ChatLogEntry;
pub use user::{NewUser, User};
