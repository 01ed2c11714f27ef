//! Interactive chat module
//!
//! Provides the reedline-based session loop, event rendering and the
//! terminal confirmation prompt.

mod commands;
mod confirmation;
mod diff;
mod render;
mod repl;

pub use commands::{CommandTable, ReplCommand};
pub use confirmation::InteractiveConfirmation;
pub use diff::render_diff;
pub use render::{EventRenderer, format_event};
pub use repl::{ChatRepl, SessionEnd, TurnOutcome};
