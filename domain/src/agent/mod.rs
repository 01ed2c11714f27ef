//! Agent-side domain concepts: confirmation decisions, gate state and
//! reasoning removal.

pub mod entities;
pub mod reasoning;

pub use entities::{ConfirmationDecision, ConfirmationState};
pub use reasoning::strip_reasoning;
