//! Immutable session data model
//!
//! A [`Session`] is a snapshot combining the model configuration, the
//! conversation history, and the variable bindings. Every mutator
//! (`with_prompt`, `with_prompt_var`, `with_prompt_file`, and the loop
//! engine's appends) returns a *new* session sharing unmodified
//! substructure with the original; nothing is ever mutated in place.
//! This makes a session safe to branch: two callers deriving from the
//! same snapshot simply produce divergent history chains.

mod history;
pub mod template;

pub use history::{ConversationHistory, HistoryEntry, ToolOutcome};
pub use template::VariableBindings;

use crate::config::Config;
use crate::errors::SessionError;
use std::path::Path;

/// Model selection for a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Model name sent to the endpoint (e.g. "gpt-4o-mini")
    pub model: String,
}

/// Immutable conversational session snapshot
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    history: ConversationHistory,
    bindings: VariableBindings,
}

impl Session {
    /// Create a session with empty history and bindings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            config: SessionConfig {
                model: model.into(),
            },
            history: ConversationHistory::new(),
            bindings: VariableBindings::new(),
        }
    }

    /// Create a session using the configured default model
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.model.default.clone())
    }

    /// Model name this session sends to the endpoint
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The full conversation history
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Current variable bindings
    pub fn bindings(&self) -> &VariableBindings {
        &self.bindings
    }

    /// Append a prompt to the session
    ///
    /// The text is stored unexpanded; `${name}` placeholders resolve at
    /// send time against the bindings current *then*, so a variable
    /// bound after this call still applies.
    #[must_use]
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            config: self.config.clone(),
            history: self.history.push(HistoryEntry::UserPrompt {
                template: prompt.into(),
            }),
            bindings: self.bindings.clone(),
        }
    }

    /// Set a variable for expansion in the prompt (overwrite semantics)
    ///
    /// Does not touch history.
    #[must_use]
    pub fn with_prompt_var(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            config: self.config.clone(),
            history: self.history.clone(),
            bindings: self.bindings.set(name, value),
        }
    }

    /// Append the contents of a file as a prompt
    ///
    /// Fails with [`SessionError::ResourceUnavailable`] if the file
    /// cannot be read. The receiver is never touched either way.
    pub fn with_prompt_file(&self, path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| SessionError::ResourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.with_prompt(contents))
    }

    /// Return a session with `entry` appended to the history
    ///
    /// Used by the loop engine; callers derive sessions through the
    /// `with_*` operations instead.
    #[must_use]
    pub(crate) fn with_entry(&self, entry: HistoryEntry) -> Self {
        Self {
            config: self.config.clone(),
            history: self.history.push(entry),
            bindings: self.bindings.clone(),
        }
    }

    /// Text of the most recent model reply
    pub fn last_reply(&self) -> Result<&str, SessionError> {
        self.history.last_reply().ok_or(SessionError::NoReplyYet)
    }

    /// Human-readable rendering of every history entry, in order
    ///
    /// This is a display projection for audit and replay, not the
    /// canonical structure.
    pub fn transcript(&self) -> Vec<String> {
        self.history
            .entries()
            .map(|entry| match entry {
                HistoryEntry::UserPrompt { template } => format!("prompt: {template}"),
                HistoryEntry::ModelReply { text } => format!("reply: {text}"),
                HistoryEntry::ToolInvocation {
                    name,
                    arguments,
                    outcome,
                    ..
                } => {
                    format!(
                        "tool: {name}({arguments}) -> {}",
                        outcome.as_reply_text(name)
                    )
                }
            })
            .collect()
    }
}
