//! One-shot orchestration pass for the trader provisioning graph.

pub mod orchestrator;

pub use orchestrator::{Orchestrator, RunOutputs, plan};
