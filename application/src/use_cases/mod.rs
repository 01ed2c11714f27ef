//! Use cases (application services)

pub mod confirmation_gate;
pub mod run_agent;
