//! Interactive CLI chat with the persona.
//!
//! This module implements the chat loop: level display, a thinking spinner
//! that can be interrupted, slash commands for switching, renaming and
//! deleting conversations, and the welcome banner.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
