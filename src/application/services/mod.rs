//! Application services - Command registration and dispatch

pub mod command_service;

pub use command_service::CommandService;
