use crate::domain::{ComposeRuntime, Container, Hook, HookRunner, Project, RegistryError};
use crate::infra::config::AppConfig;
use crate::services::listing::{parse_containers, render_containers};
use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Single point of control for project lifecycle against the engine.
///
/// Only one project may be active on the host: `start_project` and
/// `restart_project` stop every other running project first.
#[derive(Debug)]
pub struct ProjectRegistry {
    config: Arc<AppConfig>,
    runtime: Arc<dyn ComposeRuntime>,
    hooks: Arc<dyn HookRunner>,
    color: bool,
}

impl ProjectRegistry {
    pub fn new(
        config: Arc<AppConfig>,
        runtime: Arc<dyn ComposeRuntime>,
        hooks: Arc<dyn HookRunner>,
    ) -> Self {
        Self {
            config,
            runtime,
            hooks,
            color: false,
        }
    }

    /// Enables bold headers and colored state in `list_containers`.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn project_exists(&self, project: &Project) -> Result<bool> {
        let projects = self
            .runtime
            .list_projects(true)
            .map_err(|source| RegistryError::Query {
                what: "projects",
                source,
            })?;

        Ok(projects.iter().any(|p| p.name == project.name))
    }

    pub fn start_project(&self, project: &Project, recreate: bool, update: bool) -> Result<()> {
        self.stop_other_active_projects(project);

        self.run_hook(Hook::PreStart)?;

        if self.config.registry.aws_login() {
            info!("Logging into AWS registry");
            self.runtime.login_registry()?;
        }

        info!("Starting {project}");
        self.runtime.start_project(project, recreate, update)?;

        self.run_hook(Hook::PostStart)
    }

    /// Stops every running project other than `target`, continuing past
    /// failures. Returns the names that could not be stopped.
    pub fn stop_other_active_projects(&self, target: &Project) -> Vec<String> {
        info!("Stopping other active projects");

        let active = match self.runtime.list_projects(false) {
            Ok(projects) => projects,
            Err(e) => {
                warn!("Could not list active projects: {e:#}");
                return Vec::new();
            }
        };

        let mut failed = Vec::new();

        for summary in active
            .iter()
            .filter(|p| p.name != target.name && p.is_running())
        {
            debug!("Stopping {summary}");
            let other = Project::new(summary.name.clone());
            match self.runtime.stop_project(&other) {
                Ok(()) => debug!("{summary} stopped"),
                Err(e) => {
                    warn!("Could not stop {summary}: {e:#}");
                    failed.push(summary.name.clone());
                }
            }
        }

        failed
    }

    pub fn stop_project(&self, project: &Project) -> Result<()> {
        info!("Stopping {project}");

        if !self.ensure_exists(project)? {
            return Ok(());
        }

        self.runtime.stop_project(project)?;

        self.run_hook(Hook::PostStop)
    }

    pub fn restart_project(&self, project: &Project) -> Result<()> {
        self.stop_other_active_projects(project);

        info!("Restarting {project}");

        if !self.ensure_exists(project)? {
            return Ok(());
        }

        self.runtime.restart_project(project)
    }

    pub fn remove_project(&self, project: &Project) -> Result<()> {
        info!("Removing {project}");

        if !self.ensure_exists(project)? {
            return Ok(());
        }

        self.runtime.remove_project(project)
    }

    /// Builds images whether or not the project exists yet.
    pub fn build_project(&self, project: &Project, no_cache: bool) -> Result<()> {
        info!("Building {project}");
        self.runtime.build_project(project, no_cache)
    }

    pub fn terminal(&self, project: &Project, command: &str) -> Result<()> {
        info!("Running terminal for {project}");

        let project =
            project.with_default_service(self.config.terminal.default_service.as_deref());
        if !project.is_service_defined() {
            return Err(RegistryError::NoService {
                project: project.name,
                command: "terminal",
            }
            .into());
        }

        let command = match command {
            "" => self.config.terminal.default_command.as_deref().unwrap_or(""),
            cmd => cmd,
        };

        self.runtime.terminal(&project, command)
    }

    pub fn code(&self, project: &Project, dir: &str) -> Result<()> {
        info!("Opening code editor for {project}");

        let project = project.with_default_service(self.config.vscode.default_service.as_deref());

        let dir = match dir {
            "" => self.config.vscode.default_dir.as_deref().unwrap_or("/"),
            dir => dir,
        };

        let Some(container) = self.service_container(&project)? else {
            warn!("{project} not found");
            return Ok(());
        };

        self.runtime.open_code(&container, dir)
    }

    /// The running container backing `project`'s selected service, if any.
    pub fn service_container(&self, project: &Project) -> Result<Option<Container>> {
        let service = project.service_name().unwrap_or_default();

        Ok(self
            .fetch_containers()?
            .into_iter()
            .find(|c| {
                c.is_running() && c.project_name() == project.name && c.service_name() == service
            }))
    }

    /// Prints the container table to stdout.
    pub fn list_containers(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_containers(&mut out)
    }

    /// Writes the container table to `out`; nothing is written on error or
    /// when the engine reports no containers.
    pub fn write_containers<W: Write>(&self, out: &mut W) -> Result<()> {
        let containers = self.fetch_containers()?;
        if containers.is_empty() {
            return Ok(());
        }

        writeln!(out, "{}", render_containers(&containers, self.color))?;
        out.flush()?;

        Ok(())
    }

    fn fetch_containers(&self) -> Result<Vec<Container>> {
        debug!("Fetching containers");

        let records = self
            .runtime
            .fetch_containers()
            .map_err(|source| RegistryError::Query {
                what: "containers",
                source,
            })?;

        Ok(parse_containers(&records)?)
    }

    /// Warns and returns `false` when the project is unknown to the engine.
    fn ensure_exists(&self, project: &Project) -> Result<bool> {
        let exists = self.project_exists(project)?;
        if !exists {
            warn!("{project} does not exist");
        }
        Ok(exists)
    }

    fn run_hook(&self, hook: Hook) -> Result<()> {
        self.hooks
            .run_script(hook, self.config.hook_script(hook))
            .map_err(|source| RegistryError::Hook { hook, source }.into())
    }
}
