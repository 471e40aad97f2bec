//! Domain traits - Abstractions for infrastructure implementations

pub mod chat;
pub mod inference;

pub use chat::{BotInfo, ChatClient};
pub use inference::{InferenceOutcome, TextGenerator};
