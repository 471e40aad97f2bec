use async_trait::async_trait;

/// Result of a single text-generation attempt
///
/// Every attempt produces exactly one of these; transport and backend
/// failures are carried as values, never as raw errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    /// Generated reply text, prompt echo stripped and trimmed
    Success(String),
    /// The backend accepted the call but rejected the request
    BackendError(String),
    /// Network, timeout, or malformed-response failure
    TransportError(String),
}

/// TextGenerator trait - abstraction for a text-generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for the given user text
    async fn generate(&self, text: &str) -> InferenceOutcome;
}
