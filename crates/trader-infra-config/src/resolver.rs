//! Run configuration resolution.
//!
//! Each value resolves with precedence explicit override > process
//! environment > built-in default. Both API credentials are required and
//! checked here, before any stack node exists; a missing credential is a
//! hard stop and never reaches a provisioning backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use trader_infra_core::Environment;
use trader_infra_core::resources::RemovalPolicy;

use crate::{ConfigError, ConfigResult};

pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const REGION_VAR: &str = "AWS_REGION";
pub const FRED_API_KEY_VAR: &str = "FRED_API_KEY";
pub const ALPHA_VANTAGE_API_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";

const DEFAULT_ENVIRONMENT: &str = "dev";
const DEFAULT_REGION: &str = "us-east-1";

/// Immutable configuration for one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub environment: Environment,
    pub region: String,
    pub fred_api_key: String,
    pub alpha_vantage_api_key: String,
    /// Removal policy for the result bucket. Retain by default; ephemeral
    /// environments may opt into destruction on teardown.
    pub storage_removal: RemovalPolicy,
}

/// Builder-style resolver over explicit overrides and a captured
/// environment map.
///
/// The environment is snapshotted up front (or injected in tests) so
/// resolution itself reads no global state.
#[derive(Debug, Clone, Default)]
pub struct RunConfigResolver {
    environment: Option<String>,
    region: Option<String>,
    fred_api_key: Option<String>,
    alpha_vantage_api_key: Option<String>,
    storage_removal: Option<RemovalPolicy>,
    env: HashMap<String, String>,
}

impl RunConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process environment as the fallback source.
    pub fn from_process_env() -> Self {
        Self {
            env: std::env::vars().collect(),
            ..Self::default()
        }
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_fred_api_key(mut self, key: impl Into<String>) -> Self {
        self.fred_api_key = Some(key.into());
        self
    }

    pub fn with_alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    pub fn with_storage_removal(mut self, policy: RemovalPolicy) -> Self {
        self.storage_removal = Some(policy);
        self
    }

    /// Set a fallback environment variable (primarily for tests).
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Resolve one value: explicit override first, then the captured env.
    /// Empty strings count as absent at both levels.
    fn lookup(&self, explicit: &Option<String>, var: &str) -> Option<String> {
        explicit
            .clone()
            .filter(|value| !value.is_empty())
            .or_else(|| self.env.get(var).cloned().filter(|value| !value.is_empty()))
    }

    pub fn resolve(self) -> ConfigResult<RunConfig> {
        let environment = self
            .lookup(&self.environment, ENVIRONMENT_VAR)
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let environment = Environment::new(environment)
            .map_err(|e| ConfigError::InvalidEnvironment(e.to_string()))?;

        let region = self
            .lookup(&self.region, REGION_VAR)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let fred_api_key = self.lookup(&self.fred_api_key, FRED_API_KEY_VAR).ok_or(
            ConfigError::MissingCredential {
                name: "FRED API key",
                flag: "fred-api-key",
                env_var: FRED_API_KEY_VAR,
            },
        )?;

        let alpha_vantage_api_key = self
            .lookup(&self.alpha_vantage_api_key, ALPHA_VANTAGE_API_KEY_VAR)
            .ok_or(ConfigError::MissingCredential {
                name: "Alpha Vantage API key",
                flag: "alpha-vantage-api-key",
                env_var: ALPHA_VANTAGE_API_KEY_VAR,
            })?;

        Ok(RunConfig {
            environment,
            region,
            fred_api_key,
            alpha_vantage_api_key,
            storage_removal: self.storage_removal.unwrap_or(RemovalPolicy::Retain),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver_with_keys() -> RunConfigResolver {
        RunConfigResolver::new()
            .with_env_var(FRED_API_KEY_VAR, "fred-key")
            .with_env_var(ALPHA_VANTAGE_API_KEY_VAR, "av-key")
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let config = resolver_with_keys().resolve().unwrap();
        assert_eq!(config.environment.as_str(), "dev");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.storage_removal, RemovalPolicy::Retain);
    }

    #[test]
    fn test_env_var_overrides_default() {
        let config = resolver_with_keys()
            .with_env_var(ENVIRONMENT_VAR, "staging")
            .with_env_var(REGION_VAR, "eu-west-1")
            .resolve()
            .unwrap();
        assert_eq!(config.environment.as_str(), "staging");
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn test_explicit_overrides_env_var() {
        let config = resolver_with_keys()
            .with_env_var(ENVIRONMENT_VAR, "staging")
            .with_environment("prod")
            .with_fred_api_key("explicit-fred")
            .resolve()
            .unwrap();
        assert_eq!(config.environment.as_str(), "prod");
        assert_eq!(config.fred_api_key, "explicit-fred");
        assert_eq!(config.alpha_vantage_api_key, "av-key");
    }

    #[test]
    fn test_missing_fred_key_aborts() {
        let err = RunConfigResolver::new()
            .with_env_var(ALPHA_VANTAGE_API_KEY_VAR, "av-key")
            .resolve()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                env_var: FRED_API_KEY_VAR,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let err = RunConfigResolver::new()
            .with_env_var(FRED_API_KEY_VAR, "fred-key")
            .with_env_var(ALPHA_VANTAGE_API_KEY_VAR, "")
            .with_alpha_vantage_api_key("")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn test_empty_explicit_falls_back_to_env() {
        let config = resolver_with_keys()
            .with_env_var(REGION_VAR, "us-west-2")
            .with_region("")
            .resolve()
            .unwrap();
        assert_eq!(config.region, "us-west-2");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let first = resolver_with_keys().resolve().unwrap();
        let second = resolver_with_keys().resolve().unwrap();
        assert_eq!(first.environment, second.environment);
        assert_eq!(first.region, second.region);
    }

    #[test]
    fn test_storage_removal_is_opt_in_per_environment() {
        let config = resolver_with_keys()
            .with_storage_removal(RemovalPolicy::Destroy)
            .resolve()
            .unwrap();
        assert_eq!(config.storage_removal, RemovalPolicy::Destroy);
    }
}
