use crate::domain::{ComposeRuntime, Container, Project, ProjectSummary};
use crate::infra::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

const PROJECT_LABEL: &str = "label=com.docker.compose.project";

/// Drives `<engine> compose` through the command line.
#[derive(Debug, Clone)]
pub struct DockerComposeAdapter {
    engine: String,
    compose_file: Option<PathBuf>,
    aws_registry: Option<String>,
    aws_region: Option<String>,
}

impl DockerComposeAdapter {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            compose_file: None,
            aws_registry: None,
            aws_region: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            engine: config.engine().to_string(),
            compose_file: config.compose.file.clone(),
            aws_registry: config.registry.aws_registry.clone(),
            aws_region: config.registry.aws_region.clone(),
        }
    }

    /// `compose [-f FILE] -p PROJECT` prefix shared by every project command.
    fn compose_args(&self, project: &Project) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["compose".into()];
        if let Some(file) = &self.compose_file {
            args.push("-f".into());
            args.push(file.into());
        }
        args.push("-p".into());
        args.push(project.name.clone().into());
        args
    }

    fn run<I, S>(&self, args: I, context: &str) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let status = self.run_status(args, context)?;
        ensure_success(&self.engine, status, context)
    }

    fn run_status<I, S>(&self, args: I, context: &str) -> Result<ExitStatus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!("{} {:?}", self.engine, args);

        Command::new(&self.engine)
            .args(&args)
            .status()
            .with_context(|| context.to_string())
    }

    fn run_output<I, S>(&self, args: I, context: &str) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!("{} {:?}", self.engine, args);

        let output = Command::new(&self.engine)
            .args(&args)
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| context.to_string())?;

        ensure_success(&self.engine, output.status, context)?;

        String::from_utf8(output.stdout).with_context(|| format!("decoding output ({context})"))
    }
}

impl Default for DockerComposeAdapter {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ComposeRuntime for DockerComposeAdapter {
    fn list_projects(&self, include_stopped: bool) -> Result<Vec<ProjectSummary>> {
        let mut args = vec!["compose", "ls", "--format", "json"];
        if include_stopped {
            args.push("--all");
        }

        let output = self.run_output(args, "listing compose projects")?;
        parse_project_list(&output)
    }

    fn fetch_containers(&self) -> Result<Vec<String>> {
        let output = self.run_output(
            [
                "ps",
                "--all",
                "--filter",
                PROJECT_LABEL,
                "--format",
                "{{json .}}",
            ],
            "listing containers",
        )?;

        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn start_project(&self, project: &Project, recreate: bool, update: bool) -> Result<()> {
        let mut args = self.compose_args(project);
        args.extend(["up", "--detach"].map(OsString::from));
        if recreate {
            args.push("--force-recreate".into());
        }
        if update {
            args.extend(["--pull", "always", "--build"].map(OsString::from));
        }
        push_service(&mut args, project);

        self.run(args, &format!("starting {project}"))
    }

    fn stop_project(&self, project: &Project) -> Result<()> {
        let mut args = self.compose_args(project);
        args.push("stop".into());
        push_service(&mut args, project);

        self.run(args, &format!("stopping {project}"))
    }

    fn restart_project(&self, project: &Project) -> Result<()> {
        let mut args = self.compose_args(project);
        args.push("restart".into());
        push_service(&mut args, project);

        self.run(args, &format!("restarting {project}"))
    }

    fn remove_project(&self, project: &Project) -> Result<()> {
        let mut args = self.compose_args(project);
        match project.service_name() {
            Some(service) => {
                args.extend(["rm", "--stop", "--force"].map(OsString::from));
                args.push(service.into());
            }
            None => args.extend(["down", "--remove-orphans"].map(OsString::from)),
        }

        self.run(args, &format!("removing {project}"))
    }

    fn build_project(&self, project: &Project, no_cache: bool) -> Result<()> {
        let mut args = self.compose_args(project);
        args.push("build".into());
        if no_cache {
            args.push("--no-cache".into());
        }
        push_service(&mut args, project);

        self.run(args, &format!("building {project}"))
    }

    fn terminal(&self, project: &Project, command: &str) -> Result<()> {
        let Some(service) = project.service_name() else {
            bail!("no service selected for {project}");
        };

        let mut args = self.compose_args(project);
        args.push("exec".into());
        args.push(service.into());
        args.extend(command_words(command)?.into_iter().map(OsString::from));

        self.run(args, &format!("opening terminal in {project}"))
    }

    fn login_registry(&self) -> Result<()> {
        let Some(registry) = &self.aws_registry else {
            bail!("registry.aws_login is set but registry.aws_registry is missing");
        };

        let mut aws = Command::new("aws");
        aws.args(["ecr", "get-login-password"]);
        if let Some(region) = &self.aws_region {
            aws.args(["--region", region.as_str()]);
        }

        let password = aws
            .stderr(Stdio::inherit())
            .output()
            .context("requesting ECR login password")?;
        ensure_success("aws", password.status, "requesting ECR login password")?;

        let mut login = Command::new(&self.engine)
            .args(["login", "--username", "AWS", "--password-stdin", registry.as_str()])
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("logging into {registry}"))?;

        login
            .stdin
            .take()
            .context("login stdin unavailable")?
            .write_all(&password.stdout)
            .context("sending ECR password")?;

        let status = login
            .wait()
            .with_context(|| format!("logging into {registry}"))?;
        ensure_success(&self.engine, status, &format!("logging into {registry}"))
    }

    fn open_code(&self, container: &Container, dir: &str) -> Result<()> {
        let uri = attached_container_uri(&container.name, dir);
        debug!("code --folder-uri {uri}");

        let status = Command::new("code")
            .args(["--folder-uri", &uri])
            .status()
            .with_context(|| format!("opening editor in {}", container.name))?;

        ensure_success("code", status, &format!("opening editor in {}", container.name))
    }
}

fn push_service(args: &mut Vec<OsString>, project: &Project) {
    if let Some(service) = project.service_name() {
        args.push(service.into());
    }
}

/// Splits a terminal command with shell quoting rules.
fn command_words(command: &str) -> Result<Vec<String>> {
    shell_words::split(command).with_context(|| format!("parsing command {command:?}"))
}

/// `compose ls --format json` prints a single JSON array (or nothing).
fn parse_project_list(output: &str) -> Result<Vec<ProjectSummary>> {
    let output = output.trim();
    if output.is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(output).context("parsing compose project list")
}

/// VS Code remote URI for a container attached by name.
fn attached_container_uri(container_name: &str, dir: &str) -> String {
    let hex = container_name
        .bytes()
        .fold(String::with_capacity(container_name.len() * 2), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        });

    let dir = if dir.starts_with('/') {
        dir.to_string()
    } else {
        format!("/{dir}")
    };

    format!("vscode-remote://attached-container+{hex}{dir}")
}

fn ensure_success(program: &str, status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("{program} returned status {:?} ({context})", status.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_args_include_file_and_project() {
        let adapter = DockerComposeAdapter {
            compose_file: Some(PathBuf::from("/src/compose.yml")),
            ..DockerComposeAdapter::default()
        };

        let args = adapter.compose_args(&Project::new("demo"));
        let expected: Vec<OsString> = ["compose", "-f", "/src/compose.yml", "-p", "demo"]
            .map(OsString::from)
            .into();
        assert_eq!(args, expected);
    }

    #[test]
    fn command_words_respect_quotes() {
        assert_eq!(
            command_words(r#"bash -c "echo a b""#).unwrap(),
            ["bash", "-c", "echo a b"]
        );
        assert_eq!(command_words("  psql  -U app ").unwrap(), ["psql", "-U", "app"]);
        assert!(command_words("").unwrap().is_empty());
        assert!(command_words("echo 'unterminated").is_err());
    }

    #[test]
    fn parses_compose_ls_output() {
        let out = r#"[{"Name":"alpha","Status":"running(2)","ConfigFiles":"/a/compose.yml"},{"Name":"beta","Status":"exited(1)","ConfigFiles":"/b/compose.yml"}]"#;
        let projects = parse_project_list(out).unwrap();

        assert_eq!(projects.len(), 2);
        assert!(projects[0].is_running());
        assert!(!projects[1].is_running());
    }

    #[test]
    fn empty_compose_ls_output_is_no_projects() {
        assert!(parse_project_list("\n").unwrap().is_empty());
    }

    #[test]
    fn builds_attached_container_uri() {
        assert_eq!(
            attached_container_uri("ab", "srv/app"),
            "vscode-remote://attached-container+6162/srv/app"
        );
        assert_eq!(
            attached_container_uri("demo_web_1", "/app"),
            "vscode-remote://attached-container+64656d6f5f7765625f31/app"
        );
    }
}
