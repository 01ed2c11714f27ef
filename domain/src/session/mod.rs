//! LLM conversation domain.
//!
//! - [`entities::Conversation`] - system prompt plus message history
//! - [`entities::Message`] - a single message made of content blocks
//! - [`response::LlmResponse`] - one model turn, possibly requesting tools

pub mod entities;
pub mod response;
