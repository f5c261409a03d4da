//! Conversation state machine and port traits for madchat.
//!
//! This crate defines the "ports" (`PersistedStore`, `ChatGateway`,
//! `LlmProvider`) that the infrastructure layer implements, plus everything
//! that runs on top of them: the conversation store, title and level
//! derivation, the session controller, the profile store, persona shaping,
//! the `/chat` generation backend and the waitlist countdown.
//! It depends only on `madchat-types` -- never on `madchat-infra`.

pub mod backend;
pub mod chat;
pub mod llm;
pub mod persona;
pub mod profile;
pub mod storage;
pub mod waitlist;
