//! Tool contract
//!
//! This module defines the [`Tool`] trait that all invocable tools must
//! implement, the [`ToolError`] type tools report failures with, and the
//! [`ToolDescriptor`] catalog entry the engine hands to model endpoints.
//!
//! Tool failures are conversational, not fatal: the engine records them
//! in the session history and hands them back to the model on the next
//! turn so it can self-correct. A tool should therefore return a
//! `ToolError` with a message the model can act on, and never panic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors a tool invocation can report
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// A required argument was absent from the call
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// An argument was present but unusable
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument {
        /// Argument name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The tool ran but failed
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    /// Wrap any displayable error as a tool failure
    pub fn other(err: impl std::fmt::Display) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Catalog entry advertised to the model endpoint for one tool
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    /// Tool name, the string the model uses to request a call
    pub name: String,

    /// Human-readable description of what the tool does
    pub description: String,

    /// JSON-schema-shaped description of the accepted arguments
    pub schema: serde_json::Value,
}

/// Trait that all invocable tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the name of the tool; must be unique within a registry
    fn name(&self) -> &str;

    /// Returns a one-or-two-sentence description for the catalog
    fn description(&self) -> &str;

    /// Returns the argument schema advertised to the model
    fn schema(&self) -> serde_json::Value;

    /// Handle a tool invocation
    ///
    /// `args` is the argument object the model supplied, already parsed
    /// from the wire. The returned string is recorded verbatim in the
    /// session history and shown to the model on the next turn.
    async fn invoke(&self, args: serde_json::Value) -> Result<String, ToolError>;
}

impl ToolDescriptor {
    /// Build a descriptor from a tool implementation
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            schema: tool.schema(),
        }
    }
}
