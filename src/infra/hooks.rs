use crate::domain::{Hook, HookRunner};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Runs hook scripts as child processes, inheriting stdio.
#[derive(Debug, Default, Clone)]
pub struct ScriptHookRunner;

impl ScriptHookRunner {
    pub fn new() -> Self {
        Self
    }
}

impl HookRunner for ScriptHookRunner {
    fn run_script(&self, hook: Hook, script: Option<&Path>) -> Result<()> {
        let Some(script) = script else {
            debug!("No {hook} script configured");
            return Ok(());
        };

        if !script.exists() {
            bail!("{hook} script {:?} not found", script);
        }

        info!("Running {hook} script {:?}", script);

        let status = Command::new(script)
            .env("STACKCTL_HOOK", hook.as_str())
            .status()
            .with_context(|| format!("running {hook} script {:?}", script))?;

        if !status.success() {
            bail!("{hook} script {:?} exited with {:?}", script, status.code());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_script_is_a_no_op() {
        assert!(ScriptHookRunner::new().run_script(Hook::PreStart, None).is_ok());
    }

    #[test]
    fn missing_script_fails() {
        let err = ScriptHookRunner::new()
            .run_script(Hook::PostStop, Some(Path::new("/nonexistent/hook.sh")))
            .unwrap_err();
        assert!(err.to_string().contains("post-stop"));
    }

    #[test]
    fn propagates_script_exit_status() {
        let (ok, fail) = (Path::new("/bin/true"), Path::new("/bin/false"));
        if !ok.exists() || !fail.exists() {
            return;
        }

        let runner = ScriptHookRunner::new();
        assert!(runner.run_script(Hook::PostStart, Some(ok)).is_ok());
        assert!(runner.run_script(Hook::PostStart, Some(fail)).is_err());
    }
}
