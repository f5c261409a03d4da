//! Conversation state machine for madchat.
//!
//! - `store`: the persisted message record collection and its queries
//! - `title`: conversation titles derived from the first user message
//! - `levels`: anger/glitch escalation as a pure function of message count
//! - `gateway`: the `ChatGateway` port the session talks to
//! - `session`: the `SessionController` orchestrating all of the above

pub mod gateway;
pub mod levels;
pub mod session;
pub mod store;
pub mod title;
