pub mod config;
pub mod render;

pub use config::{load_config, resolve_config_path, CONFIG_ENV_VAR};

/// Error type for CLI setup failures
#[derive(Debug)]
pub enum CliError {
    ConfigNotSpecified,
    ConfigLoad(anyhow::Error),
    AdaptorBuild(sql_adaptor::AdaptorError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::ConfigNotSpecified => {
                write!(
                    f,
                    "No field configuration given. Use --config <FILE> or set the {CONFIG_ENV_VAR} environment variable (a .env file works too)."
                )
            }
            CliError::ConfigLoad(e) => {
                write!(
                    f,
                    "Failed to load field configuration: {e:#}\n\nPossible fixes:\n  - Check that the file exists and is readable\n  - Check that it is valid YAML or JSON\n  - Every entry under 'fields' needs a 'name' and a 'type'"
                )
            }
            CliError::AdaptorBuild(e) => {
                write!(
                    f,
                    "Field configuration is invalid: {e}\n\nField names must be unique ignoring case and separators, and columns must be plain SQL identifiers."
                )
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigNotSpecified => None,
            CliError::ConfigLoad(e) => Some(e.as_ref()),
            CliError::AdaptorBuild(e) => Some(e),
        }
    }
}
