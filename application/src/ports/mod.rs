//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod agent_event;
pub mod agent_runtime;
pub mod confirmation;
pub mod context_loader;
pub mod llm_gateway;
pub mod tool_executor;
pub mod tool_schema;
