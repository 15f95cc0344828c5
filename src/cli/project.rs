use crate::domain::Project;
use crate::infra::config::load_app_config;
use crate::infra::{DockerComposeAdapter, ScriptHookRunner};
use crate::services::ProjectRegistry;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::Path;
use std::sync::Arc;

/// Project selector shared by every lifecycle command
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Compose project name
    pub project: String,
    /// Restrict the command to one service of the project
    #[arg(short, long)]
    pub service: Option<String>,
}

impl ProjectArgs {
    pub fn to_project(&self) -> Project {
        let project = Project::new(self.project.clone());
        match &self.service {
            Some(service) => project.with_service(service.clone()),
            None => project,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Start a project, stopping any other active project first
    Start {
        #[command(flatten)]
        target: ProjectArgs,
        /// Recreate containers even if their configuration is unchanged
        #[arg(long)]
        recreate: bool,
        /// Pull newer images and rebuild before starting
        #[arg(long)]
        update: bool,
    },
    /// Stop a project
    Stop {
        #[command(flatten)]
        target: ProjectArgs,
    },
    /// Restart a project, stopping any other active project first
    Restart {
        #[command(flatten)]
        target: ProjectArgs,
    },
    /// Remove a project's containers and networks
    #[command(alias = "rm")]
    Remove {
        #[command(flatten)]
        target: ProjectArgs,
    },
    /// Build the project's images
    Build {
        #[command(flatten)]
        target: ProjectArgs,
        /// Do not use the build cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Open an interactive terminal inside a service container
    #[command(alias = "sh")]
    Terminal {
        #[command(flatten)]
        target: ProjectArgs,
        /// Command to run (defaults to terminal.default_command)
        #[arg(long, default_value = "")]
        cmd: String,
    },
    /// Attach VS Code to a running service container
    Code {
        #[command(flatten)]
        target: ProjectArgs,
        /// Directory to open (defaults to vscode.default_dir)
        #[arg(long, default_value = "")]
        dir: String,
    },
    /// List containers with their project, service and state
    #[command(alias = "ls")]
    List,
}

pub fn build_registry(config_dir: &Path, color: bool) -> Result<ProjectRegistry> {
    let config = Arc::new(load_app_config(config_dir)?);
    let runtime = Arc::new(DockerComposeAdapter::from_config(&config));
    let hooks = Arc::new(ScriptHookRunner::new());

    Ok(ProjectRegistry::new(config, runtime, hooks).with_color(color))
}

pub fn run(cmd: ProjectCommand, registry: &ProjectRegistry) -> Result<()> {
    match cmd {
        ProjectCommand::Start {
            target,
            recreate,
            update,
        } => registry.start_project(&target.to_project(), recreate, update),
        ProjectCommand::Stop { target } => registry.stop_project(&target.to_project()),
        ProjectCommand::Restart { target } => registry.restart_project(&target.to_project()),
        ProjectCommand::Remove { target } => registry.remove_project(&target.to_project()),
        ProjectCommand::Build { target, no_cache } => {
            registry.build_project(&target.to_project(), no_cache)
        }
        ProjectCommand::Terminal { target, cmd } => registry.terminal(&target.to_project(), &cmd),
        ProjectCommand::Code { target, dir } => registry.code(&target.to_project(), &dir),
        ProjectCommand::List => registry.list_containers(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::AppConfig;
    use crate::test_support::{MockProjectState, MockRuntime};
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: ProjectCommand,
    }

    fn parse(args: &[&str]) -> ProjectCommand {
        TestCli::try_parse_from(std::iter::once("stackctl").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn parses_start_flags() {
        match parse(&["start", "alpha", "--recreate", "-s", "web"]) {
            ProjectCommand::Start {
                target,
                recreate,
                update,
            } => {
                assert_eq!(target.to_project(), Project::new("alpha").with_service("web"));
                assert!(recreate);
                assert!(!update);
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn terminal_cmd_defaults_to_empty() {
        match parse(&["terminal", "alpha"]) {
            ProjectCommand::Terminal { cmd, .. } => assert!(cmd.is_empty()),
            _ => panic!("expected terminal"),
        }
    }

    #[test]
    fn dispatches_to_registry() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_project("alpha", MockProjectState::Running);
        let registry =
            ProjectRegistry::new(Arc::new(AppConfig::default()), mock.clone(), mock.clone());

        run(parse(&["stop", "alpha"]), &registry).unwrap();
        run(parse(&["build", "alpha", "--no-cache"]), &registry).unwrap();

        assert_eq!(mock.get_state("alpha"), Some(MockProjectState::Stopped));
        assert_eq!(mock.commands_for("build"), ["build:alpha+no-cache"]);
    }
}
