//! Dry-run backend: resolves a planned graph without touching a cloud
//! account.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

use trader_infra_core::backend::{ApplyReport, ProvisioningBackend};
use trader_infra_core::stack::{OutputValue, StackGraph};
use trader_infra_core::{Error, Result};

/// Placeholder account id used in synthesized ARNs.
pub const DRY_RUN_ACCOUNT: &str = "000000000000";

/// Resolves every export to a deterministic value, synthesizing ARNs for
/// attribute outputs. Used by tests and plan inspection; a real backend
/// reconciles the graph against live infrastructure instead.
pub struct DryRunBackend {
    region: String,
    account: String,
}

impl DryRunBackend {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account: DRY_RUN_ACCOUNT.to_string(),
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }
}

#[async_trait]
impl ProvisioningBackend for DryRunBackend {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn apply(&self, graph: &StackGraph) -> Result<ApplyReport> {
        let started_at = Utc::now();
        graph.validate()?;

        let mut applied = Vec::with_capacity(graph.len());
        let mut exports = BTreeMap::new();
        for node in graph.nodes() {
            for (name, value) in &node.outputs {
                let resolved = match value {
                    OutputValue::Literal { value } => value.clone(),
                    OutputValue::Arn { resource } => {
                        let spec = node.resource(resource).ok_or_else(|| {
                            Error::UnknownResource {
                                stack_id: node.id.to_string(),
                                resource: resource.clone(),
                            }
                        })?;
                        spec.arn(&self.region, &self.account)
                    }
                };
                exports.insert(node.export_key(name), resolved);
            }
            info!(stack = %node.id, resources = node.resources.len(), "dry-run applied stack");
            applied.push(node.id.clone());
        }

        Ok(ApplyReport {
            applied,
            exports,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trader_infra_config::RunConfigResolver;
    use trader_infra_stacks::{access_stack, storage_stack};

    fn dev_graph() -> StackGraph {
        let config = RunConfigResolver::new()
            .with_environment("dev")
            .with_fred_api_key("fred-key")
            .with_alpha_vantage_api_key("av-key")
            .resolve()
            .unwrap();
        let mut graph = StackGraph::new();
        let storage = storage_stack(&config);
        let bucket = "inverted-yield-trader-dev-results";
        graph.insert(storage).unwrap();
        graph.insert(access_stack(&config, bucket)).unwrap();
        graph
    }

    #[tokio::test]
    async fn test_dry_run_resolves_arns() {
        let report = DryRunBackend::new("us-east-1")
            .apply(&dev_graph())
            .await
            .unwrap();
        assert_eq!(
            report.exports.get("InvertedYieldTraderDevIamStack-RoleArn"),
            Some(
                &"arn:aws:iam::000000000000:role/inverted-yield-trader-dev-lambda-role"
                    .to_string()
            )
        );
        assert_eq!(
            report.exports.get("InvertedYieldTraderDevS3Stack-BucketName"),
            Some(&"inverted-yield-trader-dev-results".to_string())
        );
        assert_eq!(report.applied.len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_is_deterministic() {
        let backend = DryRunBackend::new("us-east-1");
        let graph = dev_graph();
        let first = backend.apply(&graph).await.unwrap();
        let second = backend.apply(&graph).await.unwrap();
        assert_eq!(first.exports, second.exports);
        assert_eq!(first.applied, second.applied);
    }

    #[tokio::test]
    async fn test_custom_account_shows_up_in_arns() {
        let backend = DryRunBackend::new("eu-west-1").with_account("111122223333");
        let report = backend.apply(&dev_graph()).await.unwrap();
        let role_arn = report
            .exports
            .get("InvertedYieldTraderDevIamStack-RoleArn")
            .unwrap();
        assert!(role_arn.contains("111122223333"));
    }
}
