//! Command handlers
//!
//! Bodies of the CLI commands. `main.rs` stays thin: parse, init
//! telemetry, load config, dispatch here.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::agent::LoopEngine;
use crate::config::Config;
use crate::llm::openai::OpenAiClient;
use crate::session::Session;
use crate::tools::ToolRegistry;

/// Execute the `run` command: build a session, drive the loop, print
/// the transcript.
pub async fn handle_run(
    config: &Config,
    model: Option<String>,
    prompt: Option<String>,
    vars: Vec<String>,
    prompt_file: Option<PathBuf>,
    max_loops: usize,
) -> Result<()> {
    let model = model.unwrap_or_else(|| config.model.default.clone());
    let mut session = Session::new(model);

    if let Some(text) = prompt {
        session = session.with_prompt(text);
    }
    if let Some(path) = prompt_file {
        session = session
            .with_prompt_file(&path)
            .with_context(|| format!("Failed to read prompt file {path:?}"))?;
    }
    if session.history().is_empty() {
        bail!("Nothing to send: pass a prompt or --prompt-file");
    }

    for var in vars {
        let Some((name, value)) = var.split_once('=') else {
            bail!("Invalid --var '{var}': expected NAME=VALUE");
        };
        session = session.with_prompt_var(name, value);
    }

    let client = Arc::new(OpenAiClient::with_timeout(
        config.model.endpoint.clone(),
        config.api_key(),
        Duration::from_secs(config.model.request_timeout_secs),
    ));
    let tools = Arc::new(ToolRegistry::builtin());

    let engine = LoopEngine::new(client, tools)
        .with_default_max_loops(config.loop_policy.default_max_loops)
        .with_policy(config.loop_policy.bound_policy);

    // Ctrl-C cancels between appends, leaving the history consistent.
    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match engine.run(session, max_loops).await {
        Ok(session) => {
            for line in session.transcript() {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            // Show how far the conversation got before failing.
            for line in e.session().transcript() {
                eprintln!("{line}");
            }
            Err(e.into())
        }
    }
}

/// Execute the `tools` command: print the registry documentation.
pub fn handle_tools() -> Result<()> {
    let registry = ToolRegistry::builtin();
    if registry.is_empty() {
        println!("No tools registered.");
    } else {
        println!("{}", registry.docs());
    }
    Ok(())
}
