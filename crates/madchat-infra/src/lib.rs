//! Infrastructure layer for madchat.
//!
//! Contains implementations of the port traits defined in `madchat-core`:
//! the file-backed `PersistedStore`, the reqwest `ChatGateway`, and the
//! Anthropic `LlmProvider`. Also loads `madchat.toml` and resolves the
//! data directory.

pub mod config;
pub mod filesystem;
pub mod gateway;
pub mod llm;
