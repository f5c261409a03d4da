//! Anthropic Messages API provider.

pub mod client;
pub mod types;

pub use client::AnthropicClient;
