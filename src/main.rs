use anyhow::Result;
use clap::{Parser, Subcommand};
use stackctl::cli::{ProjectCommand, project, setup};
use stackctl::infra::config;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stackctl",
    version,
    about = "Run one compose project at a time on a development host"
)]
struct Cli {
    /// Configuration directory (default: ~/.config/stackctl)
    #[arg(long, env = "STACKCTL_CONFIG_DIR", default_value_os_t = config::default_config_dir())]
    config_dir: std::path::PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (also honored through NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default stackctl.toml into the config directory
    Init,
    #[command(flatten)]
    Project(ProjectCommand),
}

/// `RUST_LOG` wins when set and valid; otherwise `info`, or `debug` with `--verbose`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), cli.verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Init => setup::install(&cli.config_dir),
        Commands::Project(cmd) => {
            let color = !cli.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal();
            let registry = project::build_registry(&cli.config_dir, color)?;
            project::run(cmd, &registry)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_overrides_default_level() {
        assert_eq!(
            log_filter(Some("warn"), false).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            log_filter(Some("error"), true).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }

    #[test]
    fn falls_back_to_verbosity_flag() {
        assert_eq!(
            log_filter(None, false).max_level_hint(),
            Some(LevelFilter::INFO)
        );
        assert_eq!(
            log_filter(Some(""), true).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }
}
