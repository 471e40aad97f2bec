//! Message handling - Routing, throttling, and auto-chat state

pub mod autochat;
pub mod parser;
pub mod rate_limit;
pub mod router;

pub use autochat::AutoChatState;
pub use parser::MessageParser;
pub use rate_limit::RateLimiter;
pub use router::{Disposition, MessageRouter};
