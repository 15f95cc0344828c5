use super::{Container, Project, ProjectSummary};
use anyhow::Result;
use std::fmt::{self, Debug};
use std::path::Path;

/// Lifecycle points at which a configured script may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    PreStart,
    PostStart,
    PostStop,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreStart => "pre-start",
            Self::PostStart => "post-start",
            Self::PostStop => "post-stop",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for compose engine operations
pub trait ComposeRuntime: Send + Sync + Debug {
    /// List compose projects; stopped ones only when `include_stopped`
    fn list_projects(&self, include_stopped: bool) -> Result<Vec<ProjectSummary>>;

    /// Raw container records, one engine JSON object per line
    fn fetch_containers(&self) -> Result<Vec<String>>;

    /// Create and start a project
    fn start_project(&self, project: &Project, recreate: bool, update: bool) -> Result<()>;

    fn stop_project(&self, project: &Project) -> Result<()>;

    fn restart_project(&self, project: &Project) -> Result<()>;

    fn remove_project(&self, project: &Project) -> Result<()>;

    fn build_project(&self, project: &Project, no_cache: bool) -> Result<()>;

    /// Run an interactive command inside the project's selected service
    fn terminal(&self, project: &Project, command: &str) -> Result<()>;

    /// Authenticate against the remote image registry
    fn login_registry(&self) -> Result<()>;

    /// Attach the editor to a running container at `dir`
    fn open_code(&self, container: &Container, dir: &str) -> Result<()>;
}

/// Runs lifecycle hook scripts.
pub trait HookRunner: Send + Sync + Debug {
    /// Succeeds without doing anything when `script` is `None`.
    fn run_script(&self, hook: Hook, script: Option<&Path>) -> Result<()>;
}
