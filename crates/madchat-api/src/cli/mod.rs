//! CLI command definitions and dispatch for the `madchat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod conversation;
pub mod levels;
pub mod profile;
pub mod waitlist;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use madchat_types::persona::PersonalityMode;

/// Chat with a bot that gets angrier the longer you talk to it.
#[derive(Parser)]
#[command(name = "madchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding madchat.toml and saved conversations.
    #[arg(long, global = true, env = "MADCHAT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with a display name (prompts when omitted).
    Login {
        /// Display name.
        name: Option<String>,

        #[arg(long)]
        gender: Option<String>,

        #[arg(long)]
        age: Option<u32>,
    },

    /// Forget the logged-in profile.
    Logout,

    /// Show the logged-in profile.
    Whoami,

    /// Start an interactive chat.
    Chat {
        /// Resume (or start) the conversation with this title.
        #[arg(short, long)]
        title: Option<String>,

        /// Override the backend URL from madchat.toml.
        #[arg(long, env = "MADCHAT_GATEWAY_URL")]
        gateway_url: Option<String>,

        /// Persona to talk to (normal or zesty).
        #[arg(long)]
        mode: Option<PersonalityMode>,
    },

    /// List saved conversations.
    #[command(alias = "ls")]
    List,

    /// Print every message of a conversation.
    Show {
        /// Conversation title.
        title: String,
    },

    /// Rename a conversation. Renaming onto an existing title merges them.
    Rename {
        old: String,
        new: String,
    },

    /// Delete a conversation.
    #[command(alias = "rm")]
    Delete {
        /// Conversation title.
        title: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show the anger and glitch levels for a message count.
    Levels {
        /// User message count (prints the whole table when omitted).
        count: Option<u32>,
    },

    /// Wait in line for a chat slot.
    Waitlist,

    /// Start the /chat generation server.
    Serve {
        /// Port to listen on (defaults to madchat.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to madchat.toml).
        #[arg(long)]
        host: Option<String>,

        /// Export spans to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
