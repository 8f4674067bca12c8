//! Configuration resolution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is required; provide --{flag} or set the {env_var} environment variable")]
    MissingCredential {
        name: &'static str,
        flag: &'static str,
        env_var: &'static str,
    },

    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
