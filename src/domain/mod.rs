//! Domain layer - Core business objects with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command)
//! - Traits: Abstractions for infrastructure (ChatClient, TextGenerator)

pub mod entities;
pub mod traits;
