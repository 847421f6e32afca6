//! Colloquy Engine Library
//!
//! This library provides the core functionality of the Colloquy engine:
//! an immutable, prompt-accumulating session over a model endpoint, a
//! tool registry dispatched by name, and the bounded conversation loop
//! that drives them. It is used by both the `colloquy` binary and the
//! integration tests.

/// Configuration management module
pub mod config;

/// Engine-level error types
pub mod errors;

/// Model endpoint abstraction layer
pub mod llm;

/// Immutable session data model
pub mod session;

/// Tool registry and built-in tools
pub mod tools;

/// Conversation loop core module
pub mod agent;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
