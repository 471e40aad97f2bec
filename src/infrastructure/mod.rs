//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Inference: Text-generation backend client
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod config;
pub mod inference;
