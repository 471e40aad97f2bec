//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command registration and dispatch
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, routing, throttling

pub mod errors;
pub mod messaging;
pub mod services;
