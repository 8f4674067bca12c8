//! Core domain types for the trader-infra provisioning graph.
//!
//! This crate contains:
//! - Environment and deterministic resource naming
//! - Stack nodes, cross-stack references, and the graph arena
//! - Declarative resource specs (bucket, role, function, rule)
//! - The provisioning backend trait and apply report types

pub mod backend;
pub mod error;
pub mod id;
pub mod naming;
pub mod resources;
pub mod stack;

pub use error::{Error, Result};
pub use id::RunId;
pub use naming::Environment;
pub use stack::{CrossStackReference, OutputValue, StackGraph, StackId, StackNode};
