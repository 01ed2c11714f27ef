//! Context loader port
//!
//! Reads the project context that goes into the system prompt.

use deckhand_domain::ProjectContext;
use std::path::Path;

/// Port for loading project context from a project directory.
///
/// Missing or unreadable files are skipped; loading never fails.
pub trait ContextLoaderPort: Send + Sync {
    fn load(&self, project_root: &Path) -> ProjectContext;
}
