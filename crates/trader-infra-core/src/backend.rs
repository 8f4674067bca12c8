//! Provisioning backend trait and apply report types.
//!
//! A backend takes a planned stack graph and reconciles it against live
//! infrastructure. Applying is the single long-running suspension point of
//! an orchestration run; this core submits once and surfaces the outcome
//! verbatim, with no retries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Result;
use crate::stack::{StackGraph, StackId};

/// Outcome of a successful apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Stacks in the order the backend applied them.
    pub applied: Vec<StackId>,
    /// Fully resolved export key -> value.
    pub exports: BTreeMap<String, String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Trait for provisioning backends.
#[async_trait]
pub trait ProvisioningBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Reconcile the graph against live infrastructure.
    ///
    /// On failure the caller must not assume which resources were or were
    /// not created; the run may be partially applied. Re-running with the
    /// same configuration is safe because resource names are deterministic
    /// and existing resources are matched rather than duplicated.
    async fn apply(&self, graph: &StackGraph) -> Result<ApplyReport>;
}
