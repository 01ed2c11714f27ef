//! Presentation layer for deckhand
//!
//! This crate contains the CLI definition, event rendering and the
//! interactive chat session.

pub mod chat;
pub mod cli;

// Re-export commonly used types
pub use chat::{ChatRepl, EventRenderer, InteractiveConfirmation, SessionEnd};
pub use cli::commands::{Cli, Command};
