//! CLI interface for Colloquy
//!
//! This module provides the command-line interface using clap's derive
//! API. It defines all commands and global flags for driving a session
//! against the configured model endpoint.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Colloquy Session Engine
///
/// An immutable, tool-dispatching conversation loop over a language
/// model endpoint: attach prompts and variables, run the bounded loop,
/// inspect the replayable history.
#[derive(Parser, Debug)]
#[command(name = "colloquy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a prompt through the conversation loop
    Run {
        /// The prompt to send (may contain ${name} placeholders)
        prompt: Option<String>,

        /// Model to use (defaults to the configured model)
        #[arg(long)]
        model: Option<String>,

        /// Bind a prompt variable, NAME=VALUE (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,

        /// Read an additional prompt from a file
        #[arg(long, value_name = "PATH")]
        prompt_file: Option<PathBuf>,

        /// Maximum loop iterations (0 = configured default)
        #[arg(long, default_value = "0")]
        max_loops: usize,
    },

    /// Print documentation for available tools
    Tools,
}
