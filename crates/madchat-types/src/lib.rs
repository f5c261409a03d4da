//! Shared domain types for madchat.
//!
//! This crate contains the types used across the madchat workspace:
//! message records, session state, the user profile, gateway wire
//! shapes, upstream completion types, configuration and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod persona;
pub mod profile;
