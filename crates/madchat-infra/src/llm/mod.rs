//! Upstream model providers.

pub mod anthropic;
