//! Deterministic resource naming.
//!
//! Every resource name derives from a fixed org prefix or job name plus the
//! target environment. For a fixed environment the derived names are
//! identical across runs, which is what makes re-running an orchestration
//! safe: the provisioning backend reconciles against already-existing
//! resources instead of creating duplicates.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Lower-case prefix for account-scoped resource names (bucket, role).
pub const ORG_PREFIX: &str = "inverted-yield-trader";

/// Pascal-case job name used for stack ids, the function, and the trigger rule.
pub const JOB_NAME: &str = "InvertedYieldTrader";

/// Target environment for a run ("dev", "staging", "prod", ...).
///
/// Resolved once per run and threaded through every definition; names are
/// never re-derived from ad-hoc strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidEnvironment(
                "environment must be non-empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character upper-cased, remainder untouched ("dev" -> "Dev").
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Stack/function prefix: `InvertedYieldTraderDev`.
pub fn stack_prefix(environment: &Environment) -> String {
    format!("{JOB_NAME}{}", environment.capitalized())
}

/// Result bucket: `inverted-yield-trader-dev-results`.
pub fn bucket_name(environment: &Environment) -> String {
    format!("{ORG_PREFIX}-{environment}-results").to_lowercase()
}

/// Execution role: `inverted-yield-trader-dev-lambda-role`.
pub fn role_name(environment: &Environment) -> String {
    format!("{ORG_PREFIX}-{environment}-lambda-role")
}

/// Compute function: `InvertedYieldTraderDev`.
pub fn function_name(environment: &Environment) -> String {
    stack_prefix(environment)
}

/// Daily trigger rule: `InvertedYieldTraderDevDailyTrigger`.
pub fn rule_name(environment: &Environment) -> String {
    format!("{}DailyTrigger", stack_prefix(environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Environment {
        Environment::new(name).unwrap()
    }

    #[test]
    fn test_empty_environment_rejected() {
        assert!(Environment::new("").is_err());
        assert!(Environment::new("   ").is_err());
    }

    #[test]
    fn test_capitalized() {
        assert_eq!(env("dev").capitalized(), "Dev");
        assert_eq!(env("staging").capitalized(), "Staging");
        assert_eq!(env("QA").capitalized(), "QA");
    }

    #[test]
    fn test_dev_names_are_bit_exact() {
        let dev = env("dev");
        assert_eq!(bucket_name(&dev), "inverted-yield-trader-dev-results");
        assert_eq!(role_name(&dev), "inverted-yield-trader-dev-lambda-role");
        assert_eq!(function_name(&dev), "InvertedYieldTraderDev");
        assert_eq!(rule_name(&dev), "InvertedYieldTraderDevDailyTrigger");
        assert_eq!(stack_prefix(&dev), "InvertedYieldTraderDev");
    }

    #[test]
    fn test_bucket_name_is_lowercased() {
        assert_eq!(bucket_name(&env("Prod")), "inverted-yield-trader-prod-results");
    }

    #[test]
    fn test_names_are_idempotent() {
        let staging = env("staging");
        assert_eq!(bucket_name(&staging), bucket_name(&staging));
        assert_eq!(rule_name(&staging), rule_name(&staging));
    }

    #[test]
    fn test_distinct_environments_never_collide() {
        let e1 = env("dev");
        let e2 = env("prod");
        assert_ne!(bucket_name(&e1), bucket_name(&e2));
        assert_ne!(role_name(&e1), role_name(&e2));
        assert_ne!(function_name(&e1), function_name(&e2));
        assert_ne!(rule_name(&e1), rule_name(&e2));
    }
}
