//! Run configuration resolution for trader-infra.
//!
//! This crate handles:
//! - Value lookup with precedence explicit > environment variable > default
//! - Required-credential validation before any stack node is built

pub mod error;
pub mod resolver;

pub use error::{ConfigError, ConfigResult};
pub use resolver::{RunConfig, RunConfigResolver};
