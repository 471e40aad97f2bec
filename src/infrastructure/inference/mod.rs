//! Inference gateway - Hugging Face text-generation backend

pub mod gateway;

pub use gateway::HuggingFaceGateway;
