use crate::domain::{ComposeRuntime, Container, Hook, HookRunner, Project, ProjectSummary};
use anyhow::{Result, bail};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockProjectState {
    Running,
    Stopped,
}

/// In-memory engine that records every call as `op:target`.
///
/// `set_fail_on` accepts either a bare operation (`"stop"`) or an operation
/// on one target (`"stop:gamma"`).
#[derive(Debug, Default)]
pub struct MockRuntime {
    projects: RwLock<BTreeMap<String, MockProjectState>>,
    container_records: RwLock<Vec<String>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<HashSet<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&self, name: &str, state: MockProjectState) {
        self.projects
            .write()
            .unwrap()
            .insert(name.to_string(), state);
    }

    pub fn get_state(&self, name: &str) -> Option<MockProjectState> {
        self.projects.read().unwrap().get(name).copied()
    }

    /// Names of projects currently running
    pub fn running_projects(&self) -> Vec<String> {
        self.projects
            .read()
            .unwrap()
            .iter()
            .filter(|(_, state)| **state == MockProjectState::Running)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Adds a well-formed container record
    pub fn add_container(&self, name: &str, state: &str, created_at: &str) {
        let record = serde_json::json!({
            "Names": name,
            "State": state,
            "CreatedAt": created_at,
        });
        self.add_container_record(&record.to_string());
    }

    /// Adds a raw record line, malformed or not
    pub fn add_container_record(&self, record: &str) {
        self.container_records
            .write()
            .unwrap()
            .push(record.to_string());
    }

    pub fn set_fail_on(&self, operation: &str) {
        self.fail_on.write().unwrap().insert(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Commands whose operation is `op`
    pub fn commands_for(&self, op: &str) -> Vec<String> {
        let prefix = format!("{op}:");
        self.get_commands()
            .into_iter()
            .filter(|c| c == op || c.starts_with(&prefix))
            .collect()
    }

    fn record_command(&self, cmd: String) {
        self.commands.write().unwrap().push(cmd);
    }

    fn check_fail(&self, operation: &str, target: &str) -> Result<()> {
        let fail_on = self.fail_on.read().unwrap();
        if fail_on.contains(operation) || fail_on.contains(&format!("{operation}:{target}")) {
            bail!("Mock failure on: {operation}:{target}");
        }
        Ok(())
    }

    fn call(&self, operation: &str, target: &str) -> Result<()> {
        self.record_command(format!("{operation}:{target}"));
        self.check_fail(operation, target)
    }

    fn set_state(&self, name: &str, state: MockProjectState) {
        self.projects
            .write()
            .unwrap()
            .insert(name.to_string(), state);
    }
}

impl ComposeRuntime for MockRuntime {
    fn list_projects(&self, include_stopped: bool) -> Result<Vec<ProjectSummary>> {
        self.call("list_projects", if include_stopped { "all" } else { "active" })?;

        Ok(self
            .projects
            .read()
            .unwrap()
            .iter()
            .filter(|(_, state)| include_stopped || **state == MockProjectState::Running)
            .map(|(name, state)| {
                let status = match state {
                    MockProjectState::Running => "running(1)",
                    MockProjectState::Stopped => "exited(1)",
                };
                ProjectSummary::new(name.clone(), status)
            })
            .collect())
    }

    fn fetch_containers(&self) -> Result<Vec<String>> {
        self.call("fetch_containers", "all")?;
        Ok(self.container_records.read().unwrap().clone())
    }

    fn start_project(&self, project: &Project, recreate: bool, update: bool) -> Result<()> {
        let mut target = project.to_string();
        if recreate {
            target.push_str("+recreate");
        }
        if update {
            target.push_str("+update");
        }
        self.record_command(format!("start:{target}"));
        self.check_fail("start", &project.name)?;

        self.set_state(&project.name, MockProjectState::Running);
        Ok(())
    }

    fn stop_project(&self, project: &Project) -> Result<()> {
        self.call("stop", &project.name)?;

        if let Some(state) = self.projects.write().unwrap().get_mut(&project.name) {
            *state = MockProjectState::Stopped;
        }
        Ok(())
    }

    fn restart_project(&self, project: &Project) -> Result<()> {
        self.call("restart", &project.name)?;
        self.set_state(&project.name, MockProjectState::Running);
        Ok(())
    }

    fn remove_project(&self, project: &Project) -> Result<()> {
        self.call("remove", &project.name)?;
        self.projects.write().unwrap().remove(&project.name);
        Ok(())
    }

    fn build_project(&self, project: &Project, no_cache: bool) -> Result<()> {
        let target = if no_cache {
            format!("{project}+no-cache")
        } else {
            project.to_string()
        };
        self.record_command(format!("build:{target}"));
        self.check_fail("build", &project.name)
    }

    fn terminal(&self, project: &Project, command: &str) -> Result<()> {
        self.record_command(format!("terminal:{project}:{command}"));
        self.check_fail("terminal", &project.name)
    }

    fn login_registry(&self) -> Result<()> {
        self.call("login", "aws")
    }

    fn open_code(&self, container: &Container, dir: &str) -> Result<()> {
        self.record_command(format!("code:{}:{dir}", container.name));
        self.check_fail("code", &container.name)
    }
}

impl HookRunner for MockRuntime {
    fn run_script(&self, hook: Hook, script: Option<&Path>) -> Result<()> {
        let target = match script {
            Some(path) => format!("{hook}={}", path.display()),
            None => hook.to_string(),
        };
        self.record_command(format!("hook:{target}"));
        self.check_fail("hook", hook.as_str())
    }
}
