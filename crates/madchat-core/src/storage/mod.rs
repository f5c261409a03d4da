//! Key-value persistence abstractions for madchat.
//!
//! Defines the synchronous `PersistedStore` trait and an in-memory
//! implementation. The file-backed implementation lives in madchat-infra.

pub mod memory;
pub mod persisted;

pub use memory::MemoryStore;
pub use persisted::{HISTORY_KEY, PROFILE_KEY, PersistedStore};
