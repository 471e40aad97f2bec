//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;
pub mod user;

pub use command::{Command, CommandRegistry};
pub use message::{extract_mentions, Content, Message};
pub use user::User;
