//! Colloquy SDK
//!
//! Shared library providing the tool contract for Colloquy components.
//! This crate is used by the engine and by external tool implementations:
//! a tool implements [`Tool`], the engine dispatches it by name during
//! the conversation loop, and [`ToolDescriptor`] is what gets advertised
//! to the model endpoint.

/// Tool trait, errors, and catalog types
pub mod tool;

// Re-export commonly used types
pub use tool::{Tool, ToolDescriptor, ToolError};
