//! Conversation Loop Core
//!
//! This module implements the bounded iterate-send-dispatch-append
//! cycle over a session: project the history, call the model endpoint,
//! record the reply, resolve requested tool calls through the registry,
//! and repeat until the model stops requesting tools or the iteration
//! bound is hit.

pub mod core;

pub use core::{BoundPolicy, LoopEngine, LoopError, DEFAULT_MAX_LOOPS};
