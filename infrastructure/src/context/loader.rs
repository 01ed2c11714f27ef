//! Local file system context loader
//!
//! [`LocalContextLoader`] implements [`ContextLoaderPort`] by probing the
//! project root for known files:
//!
//! 1. The first non-empty instruction file in priority order
//!    (`.deckhand/context.md`, `AGENTS.md`, `CLAUDE.md`, `README.md`)
//!    becomes the instructions section of the system prompt.
//! 2. The first build manifest found (`Cargo.toml`, `package.json`,
//!    `pyproject.toml`) decides the project type.
//!
//! Unreadable files are logged and skipped; loading never fails.

use deckhand_application::ports::context_loader::ContextLoaderPort;
use deckhand_domain::{KnownContextFile, ProjectContext};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Context loader that reads from the local file system.
#[derive(Debug, Clone, Default)]
pub struct LocalContextLoader;

impl LocalContextLoader {
    pub fn new() -> Self {
        Self
    }

    /// Content of `file_type` under `project_root`, if present and non-empty
    fn read_known(&self, project_root: &Path, file_type: KnownContextFile) -> Option<String> {
        let path = project_root.join(file_type.relative_path());
        if !path.is_file() {
            return None;
        }

        match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => {
                debug!("Skipping empty file: {:?}", path);
                None
            }
            Ok(content) => {
                debug!("Loaded context file: {:?}", path);
                Some(content)
            }
            Err(e) => {
                warn!("Failed to read file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl ContextLoaderPort for LocalContextLoader {
    fn load(&self, project_root: &Path) -> ProjectContext {
        let mut context = ProjectContext::new(
            project_root.display().to_string(),
            std::env::consts::OS,
        );

        if let Some((file_type, content)) = KnownContextFile::instruction_files()
            .into_iter()
            .find_map(|f| self.read_known(project_root, f).map(|c| (f, c)))
        {
            context = context.with_instructions(file_type, content);
        }

        if let Some((_, project_type)) = KnownContextFile::manifests()
            .into_iter()
            .find(|(f, _)| project_root.join(f.relative_path()).is_file())
        {
            context = context.with_project_type(project_type);
        }

        debug!(
            root = ?project_root,
            instructions = ?context.instructions_source,
            project_type = ?context.project_type,
            "Loaded project context"
        );
        context
    }
}
