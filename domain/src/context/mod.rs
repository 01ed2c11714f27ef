//! Project context assembled into the system prompt
//!
//! The context tells the model where it is running: the working directory,
//! the platform, the detected project type and the first instruction file
//! found in the project.
//!
//! # Context Priority
//!
//! 1. `.deckhand/context.md` - project-local instructions for this client
//! 2. `AGENTS.md`
//! 3. `CLAUDE.md`
//! 4. `README.md` - used only when none of the above exist

/// Files the context loader knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownContextFile {
    DeckhandContext,
    AgentsMd,
    ClaudeMd,
    ReadmeMd,
    CargoToml,
    PackageJson,
    PyprojectToml,
}

impl KnownContextFile {
    /// Path relative to the project root
    pub fn relative_path(&self) -> &'static str {
        match self {
            KnownContextFile::DeckhandContext => ".deckhand/context.md",
            KnownContextFile::AgentsMd => "AGENTS.md",
            KnownContextFile::ClaudeMd => "CLAUDE.md",
            KnownContextFile::ReadmeMd => "README.md",
            KnownContextFile::CargoToml => "Cargo.toml",
            KnownContextFile::PackageJson => "package.json",
            KnownContextFile::PyprojectToml => "pyproject.toml",
        }
    }

    /// Instruction files in priority order
    pub fn instruction_files() -> [KnownContextFile; 4] {
        [
            KnownContextFile::DeckhandContext,
            KnownContextFile::AgentsMd,
            KnownContextFile::ClaudeMd,
            KnownContextFile::ReadmeMd,
        ]
    }

    /// Build manifests and the project type they reveal
    pub fn manifests() -> [(KnownContextFile, &'static str); 3] {
        [
            (KnownContextFile::CargoToml, "rust"),
            (KnownContextFile::PackageJson, "nodejs"),
            (KnownContextFile::PyprojectToml, "python"),
        ]
    }
}

impl std::fmt::Display for KnownContextFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path())
    }
}

/// Aggregated project context
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    pub working_dir: String,
    /// `std::env::consts::OS` of the running process
    pub platform: String,
    pub project_type: Option<String>,
    /// Content of the highest-priority instruction file
    pub instructions: Option<String>,
    pub instructions_source: Option<KnownContextFile>,
}

impl ProjectContext {
    pub fn new(working_dir: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            platform: platform.into(),
            ..Default::default()
        }
    }

    pub fn with_instructions(mut self, source: KnownContextFile, content: impl Into<String>) -> Self {
        self.instructions = Some(content.into());
        self.instructions_source = Some(source);
        self
    }

    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }
}
