//! Model Endpoint Abstraction Layer
//!
//! This module provides the contract between the loop engine and
//! whatever actually talks to a language model. The [`ModelClient`]
//! trait is the single capability the engine needs: send the projected
//! conversation plus the tool catalog, get back a reply and zero or
//! more requested tool calls. One HTTP implementation is provided in
//! [`openai`]; the loop tests drive a scripted client instead.

use async_trait::async_trait;
use sdk::ToolDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod openai;

/// Result type for endpoint operations
pub type Result<T> = std::result::Result<T, EndpointError>;

/// Transport/protocol failures from a model endpoint
///
/// Loop-fatal: the engine does not retry internally. Retry policy, if
/// any, belongs to the client implementation.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Message in the wire-facing projection of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: MessageRole,

    /// Content of the message
    pub content: String,

    /// Optional tool call ID for tool result messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Tool calls this assistant message requested
    ///
    /// Every `tool` message on the wire must answer a preceding
    /// assistant message that carries the matching call, so assistant
    /// turns keep their requests when the conversation is re-sent.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a new tool result message
    pub fn tool_result(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,

    /// Assistant message
    Assistant,

    /// System message
    System,

    /// Tool result message
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// One tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Endpoint-assigned identifier for this call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Argument object for the tool
    pub arguments: serde_json::Value,
}

impl ToolCallRequest {
    /// Create a new tool call request
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// What one endpoint round trip produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelReply {
    /// Reply text (may be empty when the model only requests tools)
    pub text: String,

    /// Tool calls requested by the model, in request order
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelReply {
    /// A reply with no tool calls: the conversation settles
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply that requests tool calls
    pub fn with_tool_calls(text: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            text: text.into(),
            tool_calls,
        }
    }
}

/// Capability the loop engine needs from a model endpoint
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Returns the name of the client (e.g. "openai")
    fn name(&self) -> &str;

    /// Send the conversation and tool catalog, await one reply
    ///
    /// `messages` is the expanded, ordered projection of the session
    /// history. This is the single suspension point of the whole loop.
    async fn send(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply>;
}
