use crate::CliError;
use anyhow::Context;
use log::debug;
use sql_adaptor::{AdaptorConfig, SqlAdaptor};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "SIEVE_CONFIG";

/// Picks the config file from `--config`, falling back to the value of
/// `SIEVE_CONFIG`.
pub fn resolve_config_path(
    arg: Option<PathBuf>,
    env_value: Option<OsString>,
) -> Result<PathBuf, CliError> {
    arg.or_else(|| env_value.map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(CliError::ConfigNotSpecified)
}

/// Reads a field configuration file. JSON is accepted as a subset of YAML.
pub fn load_config(path: &Path) -> anyhow::Result<AdaptorConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: AdaptorConfig = serde_yaml_ng::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(
        "Loaded {} fields and {} key/value collections from {}",
        config.fields.len(),
        config.key_value.len(),
        path.display()
    );
    Ok(config)
}

pub fn build_adaptor(path: &Path) -> Result<SqlAdaptor, CliError> {
    let config = load_config(path).map_err(CliError::ConfigLoad)?;
    SqlAdaptor::from_config(&config).map_err(CliError::AdaptorBuild)
}
