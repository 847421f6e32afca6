//! Conversation History
//!
//! Append-only, totally ordered log of everything that happened in a
//! session: user prompts (stored as unexpanded templates), model
//! replies, and tool invocation records. The log is a persistent
//! structure: `push` produces a new history that shares every existing
//! entry with its parent, so deriving a session is cheap and an older
//! snapshot can never observe later appends.
//!
//! Ordering invariant: a tool invocation entry always follows the model
//! reply that requested it and precedes the next model reply.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of dispatching one requested tool call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool ran and produced output
    Ok {
        /// Tool output, recorded verbatim
        result: String,
    },

    /// The requested name matched no registered tool
    UnknownTool,

    /// The tool ran and reported a failure
    Failed {
        /// Failure message, handed back to the model on the next turn
        message: String,
    },
}

impl ToolOutcome {
    /// Render the outcome as the text the model sees on the next turn
    pub fn as_reply_text(&self, tool_name: &str) -> String {
        match self {
            ToolOutcome::Ok { result } => result.clone(),
            ToolOutcome::UnknownTool => {
                format!("ERROR: unknown tool '{tool_name}'")
            }
            ToolOutcome::Failed { message } => format!("ERROR: {message}"),
        }
    }

    /// Returns true for the two error outcomes
    pub fn is_error(&self) -> bool {
        !matches!(self, ToolOutcome::Ok { .. })
    }
}

/// One turn in the conversation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A prompt attached by the caller, kept as the raw template text.
    /// Variable expansion happens at send time, not here.
    UserPrompt {
        /// Unexpanded template text
        template: String,
    },

    /// A reply returned by the model endpoint
    ModelReply {
        /// Reply text
        text: String,
    },

    /// One requested tool call and what came of it
    ToolInvocation {
        /// Endpoint-assigned call identifier, echoed back on the
        /// tool-result message of the next turn
        call_id: String,

        /// Requested tool name
        name: String,

        /// Argument object the model supplied
        arguments: serde_json::Value,

        /// What the dispatch produced
        outcome: ToolOutcome,
    },
}

/// Append-only log of [`HistoryEntry`] values with structural sharing
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    entries: Vec<Arc<HistoryEntry>>,
}

impl ConversationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new history with `entry` appended
    ///
    /// The receiver is untouched; all existing entries are shared
    /// between the two values.
    #[must_use]
    pub fn push(&self, entry: HistoryEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(Arc::new(entry));
        Self { entries }
    }

    /// Iterate entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().map(Arc::as_ref)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry has been appended yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text of the most recent model reply, if any
    pub fn last_reply(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e.as_ref() {
            HistoryEntry::ModelReply { text } => Some(text.as_str()),
            _ => None,
        })
    }
}
