use crate::domain::Hook;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_TOML_NAME: &str = "stackctl.toml";
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/default_stackctl.toml");

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config/stackctl")
}

pub fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    fs::create_dir_all(config_dir).with_context(|| format!("creating {:?}", config_dir))
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    pub pre_start: Option<PathBuf>,
    pub post_start: Option<PathBuf>,
    pub post_stop: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub aws_login: Option<bool>,
    pub aws_registry: Option<String>,
    pub aws_region: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminalConfig {
    pub default_service: Option<String>,
    pub default_command: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct VscodeConfig {
    pub default_service: Option<String>,
    pub default_dir: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ComposeConfig {
    /// Engine binary (`docker`, `podman`)
    pub engine: Option<String>,
    /// Compose file handed to every project command
    pub file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub hooks: HooksConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub vscode: VscodeConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

impl RegistryConfig {
    pub fn aws_login(&self) -> bool {
        self.aws_login.unwrap_or(false)
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        merge_opt(&mut self.hooks.pre_start, other.hooks.pre_start);
        merge_opt(&mut self.hooks.post_start, other.hooks.post_start);
        merge_opt(&mut self.hooks.post_stop, other.hooks.post_stop);

        merge_opt(&mut self.registry.aws_login, other.registry.aws_login);
        merge_opt(&mut self.registry.aws_registry, other.registry.aws_registry);
        merge_opt(&mut self.registry.aws_region, other.registry.aws_region);

        merge_opt(
            &mut self.terminal.default_service,
            other.terminal.default_service,
        );
        merge_opt(
            &mut self.terminal.default_command,
            other.terminal.default_command,
        );

        merge_opt(&mut self.vscode.default_service, other.vscode.default_service);
        merge_opt(&mut self.vscode.default_dir, other.vscode.default_dir);

        merge_opt(&mut self.compose.engine, other.compose.engine);
        merge_opt(&mut self.compose.file, other.compose.file);
    }

    pub fn hook_script(&self, hook: Hook) -> Option<&Path> {
        match hook {
            Hook::PreStart => self.hooks.pre_start.as_deref(),
            Hook::PostStart => self.hooks.post_start.as_deref(),
            Hook::PostStop => self.hooks.post_stop.as_deref(),
        }
    }

    pub fn engine(&self) -> &str {
        self.compose.engine.as_deref().unwrap_or("docker")
    }

    fn expand_paths(&mut self) {
        for path in [
            &mut self.hooks.pre_start,
            &mut self.hooks.post_start,
            &mut self.hooks.post_stop,
            &mut self.compose.file,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_tilde(path);
        }
    }
}

fn merge_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_string_lossy().as_ref()).into_owned())
}

pub fn install_default_config(target_dir: &Path) -> Result<bool> {
    ensure_config_dir(target_dir)?;

    let target = target_dir.join(DEFAULT_CONFIG_TOML_NAME);
    if target.exists() {
        return Ok(false);
    }

    fs::write(&target, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("writing template to {:?}", target))?;

    Ok(true)
}

fn read_config_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {:?}", path))
}

/// Loads `stackctl.toml` from `config_dir`, then merges `./stackctl.toml`
/// from the working directory over it.
pub fn load_app_config(config_dir: &Path) -> Result<AppConfig> {
    load_app_config_from(config_dir, Path::new("./"))
}

pub fn load_app_config_from(config_dir: &Path, local_dir: &Path) -> Result<AppConfig> {
    let global_config_path = config_dir.join(DEFAULT_CONFIG_TOML_NAME);
    let mut app_config = AppConfig::default();

    if global_config_path.exists() {
        app_config = read_config_file(&global_config_path)?;
    }

    let local_config_path = local_dir.join(DEFAULT_CONFIG_TOML_NAME);
    if local_config_path.exists() && local_config_path != global_config_path {
        app_config.merge(read_config_file(&local_config_path)?);
    }

    app_config.expand_paths();

    Ok(app_config)
}
