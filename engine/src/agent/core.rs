//! Loop Engine
//!
//! The central algorithm of the engine. Each iteration:
//!
//! 1. Project the session history into outbound messages, expanding
//!    prompt templates against the current bindings
//! 2. Call the model endpoint (the single suspension point)
//! 3. Append the reply to the session
//! 4. If no tool calls were requested: settled, return the session
//! 5. Otherwise dispatch each requested call in request order and
//!    append its outcome, then go around again
//!
//! The loop is always bounded: a `max_loops` of zero selects the
//! engine's default bound, never "unlimited". Hitting the bound is a
//! distinguishable outcome, strict (error) or lenient (partial session)
//! per [`BoundPolicy`]. Cancellation is observed before each endpoint
//! call and before each tool invocation; the session is always left at
//! its last fully-appended entry.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::llm::{EndpointError, Message, MessageRole, ModelClient, ToolCallRequest};
use crate::session::{template, HistoryEntry, Session};
use crate::tools::ToolRegistry;

/// Iteration bound used when the caller passes zero.
///
/// Never unlimited: runaway tool-call cycles are a correctness and cost
/// hazard, so an unspecified bound means this default.
pub const DEFAULT_MAX_LOOPS: usize = 10;

/// What happens when the iteration bound is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundPolicy {
    /// Raise [`LoopError::BoundExceeded`] carrying the partial session
    #[default]
    Strict,

    /// Return the partial session as a normal result
    Lenient,
}

/// Loop-fatal failures
///
/// Every variant carries the session in its last fully-appended state;
/// partial entries are never exposed.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    /// The iteration budget was exhausted under the strict policy
    #[error("loop bound of {bound} iterations exceeded")]
    BoundExceeded {
        /// The bound that was in effect
        bound: usize,
        /// Session as of the last completed iteration
        session: Box<Session>,
    },

    /// The model endpoint failed; the engine does not retry
    #[error("model endpoint failure")]
    Endpoint {
        /// Underlying transport/protocol failure
        #[source]
        source: EndpointError,
        /// Session as of the last fully-appended entry
        session: Box<Session>,
    },

    /// External cancellation was observed
    #[error("loop cancelled")]
    Cancelled {
        /// Session as of the last fully-appended entry
        session: Box<Session>,
    },
}

impl LoopError {
    /// The last-consistent session state at the point of failure
    pub fn session(&self) -> &Session {
        match self {
            LoopError::BoundExceeded { session, .. }
            | LoopError::Endpoint { session, .. }
            | LoopError::Cancelled { session } => session,
        }
    }
}

/// Drives the bounded conversation loop over immutable sessions
pub struct LoopEngine {
    /// Model endpoint capability
    client: Arc<dyn ModelClient>,

    /// Read-only tool catalog for dispatch
    tools: Arc<ToolRegistry>,

    /// Bound used when the caller passes zero
    default_max_loops: usize,

    /// Strict or lenient bound handling
    policy: BoundPolicy,

    /// External cancellation signal
    cancel: CancellationToken,
}

impl LoopEngine {
    /// Create an engine with the default bound and strict policy
    pub fn new(client: Arc<dyn ModelClient>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            tools,
            default_max_loops: DEFAULT_MAX_LOOPS,
            policy: BoundPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the bound-exceeded policy
    #[must_use]
    pub fn with_policy(mut self, policy: BoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the bound used when the caller passes zero (minimum 1)
    #[must_use]
    pub fn with_default_max_loops(mut self, bound: usize) -> Self {
        self.default_max_loops = bound.max(1);
        self
    }

    /// Use an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that cancels any loop run on this engine
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the loop over `session`, at most `max_loops` iterations
    ///
    /// `max_loops == 0` selects the engine default. Returns the settled
    /// session, or the partial session under the lenient bound policy.
    pub async fn run(&self, session: Session, max_loops: usize) -> Result<Session, LoopError> {
        let bound = if max_loops == 0 {
            self.default_max_loops
        } else {
            max_loops
        };
        let catalog = self.tools.catalog();

        let mut session = session;
        let mut iteration = 0usize;

        loop {
            iteration += 1;
            debug!("Loop iteration {}/{}", iteration, bound);

            if self.cancel.is_cancelled() {
                return Err(LoopError::Cancelled {
                    session: Box::new(session),
                });
            }

            let messages = project_messages(&session);
            let reply = match self.client.send(session.model(), &messages, &catalog).await {
                Ok(reply) => reply,
                Err(source) => {
                    return Err(LoopError::Endpoint {
                        source,
                        session: Box::new(session),
                    })
                }
            };

            session = session.with_entry(HistoryEntry::ModelReply {
                text: reply.text.clone(),
            });

            if reply.tool_calls.is_empty() {
                info!("Session settled after {} iteration(s)", iteration);
                return Ok(session);
            }

            // Resolve in request order, awaiting each result before the
            // next, so append order always matches request order.
            for call in &reply.tool_calls {
                if self.cancel.is_cancelled() {
                    return Err(LoopError::Cancelled {
                        session: Box::new(session),
                    });
                }

                let outcome = self.tools.dispatch(&call.name, call.arguments.clone()).await;
                session = session.with_entry(HistoryEntry::ToolInvocation {
                    call_id: call.id.clone(),
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                    outcome,
                });
            }

            if iteration >= bound {
                return match self.policy {
                    BoundPolicy::Strict => Err(LoopError::BoundExceeded {
                        bound,
                        session: Box::new(session),
                    }),
                    BoundPolicy::Lenient => {
                        warn!(
                            "Loop bound of {} iterations exceeded, returning partial session",
                            bound
                        );
                        Ok(session)
                    }
                };
            }
        }
    }
}

/// Project a session's history into the outbound message sequence
///
/// Prompt templates are expanded against the session's *current*
/// bindings here, at send time, which is what makes variable binding
/// lazy. Consecutive user prompts are concatenated into one outgoing
/// message.
///
/// Tool invocation records are projected twice: the original request is
/// reattached to the assistant turn that made it (wire contracts reject
/// a `tool` message whose call the preceding assistant message does not
/// carry), and the outcome becomes the `tool` message that answers it.
fn project_messages(session: &Session) -> Vec<Message> {
    let bindings = session.bindings();
    let mut messages: Vec<Message> = Vec::new();
    let mut pending_prompts: Vec<String> = Vec::new();

    for entry in session.history().entries() {
        match entry {
            HistoryEntry::UserPrompt { template: text } => {
                pending_prompts.push(template::expand(text, bindings));
            }
            HistoryEntry::ModelReply { text } => {
                flush_prompts(&mut pending_prompts, &mut messages);
                messages.push(Message::assistant(text.clone()));
            }
            HistoryEntry::ToolInvocation {
                call_id,
                name,
                arguments,
                outcome,
            } => {
                flush_prompts(&mut pending_prompts, &mut messages);
                // Ordering invariant: the requesting reply is the most
                // recent assistant message.
                if let Some(assistant) = messages
                    .iter_mut()
                    .rev()
                    .find(|m| m.role == MessageRole::Assistant)
                {
                    assistant.tool_calls.push(ToolCallRequest::new(
                        call_id.clone(),
                        name.clone(),
                        arguments.clone(),
                    ));
                }
                messages.push(Message::tool_result(outcome.as_reply_text(name), call_id));
            }
        }
    }

    flush_prompts(&mut pending_prompts, &mut messages);
    messages
}

fn flush_prompts(pending: &mut Vec<String>, messages: &mut Vec<Message>) {
    if !pending.is_empty() {
        messages.push(Message::user(pending.join("\n")));
        pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn test_project_expands_and_concatenates_prompts() {
        let session = Session::new("m")
            .with_prompt("Hi ${name}")
            .with_prompt("How are you?")
            .with_prompt_var("name", "Ann");

        let messages = project_messages(&session);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hi Ann\nHow are you?");
    }

    #[test]
    fn test_project_interleaves_turns_in_order() {
        let session = Session::new("m")
            .with_prompt("ask")
            .with_entry(HistoryEntry::ModelReply {
                text: "calling".to_string(),
            })
            .with_entry(HistoryEntry::ToolInvocation {
                call_id: "call_1".to_string(),
                name: "echo".to_string(),
                arguments: serde_json::json!({"text": "x"}),
                outcome: crate::session::ToolOutcome::Ok {
                    result: "x".to_string(),
                },
            })
            .with_prompt("follow-up");

        let messages = project_messages(&session);
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::Tool,
                MessageRole::User
            ]
        );
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_project_reattaches_requests_to_assistant_turn() {
        let session = Session::new("m")
            .with_prompt("ask")
            .with_entry(HistoryEntry::ModelReply {
                text: String::new(),
            })
            .with_entry(HistoryEntry::ToolInvocation {
                call_id: "call_a".to_string(),
                name: "echo".to_string(),
                arguments: serde_json::json!({"text": "a"}),
                outcome: crate::session::ToolOutcome::Ok {
                    result: "a".to_string(),
                },
            })
            .with_entry(HistoryEntry::ToolInvocation {
                call_id: "call_b".to_string(),
                name: "echo".to_string(),
                arguments: serde_json::json!({"text": "b"}),
                outcome: crate::session::ToolOutcome::Ok {
                    result: "b".to_string(),
                },
            })
            .with_entry(HistoryEntry::ModelReply {
                text: "done".to_string(),
            });

        let messages = project_messages(&session);

        // Both requests hang off the assistant turn that made them, in
        // request order; the settling reply carries none.
        let ids: Vec<_> = messages[1].tool_calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["call_a", "call_b"]);
        assert_eq!(messages[1].tool_calls[0].arguments["text"], "a");
        assert!(messages[4].tool_calls.is_empty());
    }

    #[test]
    fn test_project_empty_session() {
        assert!(project_messages(&Session::new("m")).is_empty());
    }
}
