//! Orchestrator - builds the stack graph in dependency order and submits
//! it to a provisioning backend.
//!
//! Construction is a single-threaded pass: storage, access, compute,
//! schedule, each consuming its predecessors' outputs through cross-stack
//! references resolved eagerly against the arena. Submission is the one
//! suspension point; backend errors are surfaced unmodified and nothing is
//! retried here.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info};

use trader_infra_config::RunConfig;
use trader_infra_core::backend::ProvisioningBackend;
use trader_infra_core::{CrossStackReference, Result, RunId, StackGraph};
use trader_infra_stacks::{access, compute, schedule, storage};

/// Final artifacts of a successful run.
#[derive(Debug)]
pub struct RunOutputs {
    pub run_id: RunId,
    /// The graph as constructed, before backend resolution.
    pub graph: StackGraph,
    /// Backend-resolved export key -> value.
    pub exports: BTreeMap<String, String>,
}

/// Build the full stack graph for one run. Pure: no backend interaction,
/// no side effects beyond the returned arena.
pub fn plan(config: &RunConfig) -> Result<StackGraph> {
    let environment = &config.environment;
    let mut graph = StackGraph::new();

    graph.insert(storage::storage_stack(config))?;
    info!(stack = %storage::id(environment), "planned storage stack");

    let bucket = graph
        .resolve_literal(&CrossStackReference::new(
            storage::id(environment),
            storage::BUCKET_NAME_OUTPUT,
        ))?
        .to_string();

    graph.insert(access::access_stack(config, &bucket))?;
    info!(stack = %access::id(environment), "planned access stack");

    let role = graph
        .resolve_literal(&CrossStackReference::new(
            access::id(environment),
            access::ROLE_NAME_OUTPUT,
        ))?
        .to_string();

    graph.insert(compute::compute_stack(config, &bucket, &role))?;
    info!(stack = %compute::id(environment), "planned compute stack");

    let function = graph
        .resolve_literal(&CrossStackReference::new(
            compute::id(environment),
            compute::FUNCTION_NAME_OUTPUT,
        ))?
        .to_string();

    graph.insert(schedule::schedule_stack(config, &function))?;
    info!(stack = %schedule::id(environment), "planned schedule stack");

    graph.validate()?;
    Ok(graph)
}

/// Drives plan + apply against a pluggable backend.
pub struct Orchestrator {
    backend: Arc<dyn ProvisioningBackend>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ProvisioningBackend>) -> Self {
        Self { backend }
    }

    /// Plan the graph and submit it in a single call.
    ///
    /// A failed apply may have been partially applied; re-running with the
    /// same configuration reconciles against existing resources because
    /// every name is deterministic.
    pub async fn run(&self, config: &RunConfig) -> Result<RunOutputs> {
        let run_id = RunId::new();
        info!(
            %run_id,
            environment = %config.environment,
            region = %config.region,
            "starting orchestration"
        );

        let graph = plan(config)?;
        info!(
            %run_id,
            stacks = graph.len(),
            backend = self.backend.name(),
            "submitting graph"
        );

        let report = match self.backend.apply(&graph).await {
            Ok(report) => report,
            Err(e) => {
                error!(%run_id, error = %e, "apply failed");
                return Err(e);
            }
        };

        info!(%run_id, exports = report.exports.len(), "orchestration complete");
        Ok(RunOutputs {
            run_id,
            graph,
            exports: report.exports,
        })
    }
}
