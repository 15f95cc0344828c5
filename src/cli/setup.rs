use crate::infra::config::{DEFAULT_CONFIG_TOML_NAME, install_default_config};
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

pub fn install(config_dir: &Path) -> Result<()> {
    info!("Preparing config in {:?}", config_dir);

    if install_default_config(config_dir)? {
        info!(
            "Config ready. Adjust {} as needed ({:?})",
            DEFAULT_CONFIG_TOML_NAME,
            config_dir.join(DEFAULT_CONFIG_TOML_NAME)
        );
    } else {
        warn!(
            "{} already exists in {:?}, leaving it untouched",
            DEFAULT_CONFIG_TOML_NAME, config_dir
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::{DEFAULT_CONFIG_TOML, load_app_config_from};
    use std::fs;

    #[test]
    fn installs_default_config_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target_dir = temp_dir.path().join("stackctl");

        install(&target_dir).unwrap();
        let path = target_dir.join(DEFAULT_CONFIG_TOML_NAME);
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG_TOML);

        fs::write(&path, "[terminal]\ndefault_service = \"web\"\n").unwrap();
        install(&target_dir).unwrap();

        let config = load_app_config_from(&target_dir, temp_dir.path()).unwrap();
        assert_eq!(config.terminal.default_service.as_deref(), Some("web"));
    }
}
