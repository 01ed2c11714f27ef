//! Application layer for deckhand
//!
//! This crate contains the port definitions, the confirmation gate and the
//! tool-use agent runtime. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AgentConfig;
pub use ports::{
    agent_event::{AgentEvent, AgentEventReceiver, AgentEventSender, agent_event_channel},
    agent_runtime::{AgentRuntime, RuntimeError},
    confirmation::{
        AutoApproveConfirmation, AutoDenyConfirmation, ConfirmationError, ConfirmationPort,
        ConfirmationRequest,
    },
    context_loader::ContextLoaderPort,
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    tool_executor::{RegistryError, ToolExecutorPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::confirmation_gate::{ConfirmationGate, GateError, PendingConfirmation};
pub use use_cases::run_agent::ToolUseAgent;
