//! Context loading infrastructure
//!
//! Implements [`ContextLoaderPort`] for the local file system.
//!
//! [`ContextLoaderPort`]: deckhand_application::ports::context_loader::ContextLoaderPort

mod loader;

pub use loader::LocalContextLoader;
