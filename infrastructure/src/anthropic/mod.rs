//! Anthropic Messages API provider
//!
//! `POST {base_url}/v1/messages` with native tool use. Non-streaming: one
//! request per model turn.

mod gateway;
mod types;

pub use gateway::{API_VERSION, AnthropicGateway};
