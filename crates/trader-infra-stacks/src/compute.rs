//! Compute stack: the scheduled analysis function.

use std::collections::BTreeMap;
use std::path::PathBuf;

use trader_infra_config::RunConfig;
use trader_infra_core::naming;
use trader_infra_core::resources::{FunctionSpec, ResourceKind, ResourceSpec};
use trader_infra_core::{Environment, OutputValue, StackId, StackNode};

use crate::{access, storage};

pub const FUNCTION_RESOURCE: &str = "TraderFunction";
pub const FUNCTION_ARN_OUTPUT: &str = "Arn";
pub const FUNCTION_NAME_OUTPUT: &str = "Name";

/// Relative path where the build pipeline leaves the deployable package.
pub const ARTIFACT_PATH: &str = "lambda-function.zip";

const RUNTIME: &str = "provided.al2";
const HANDLER: &str = "bootstrap";
const TIMEOUT_SECONDS: u32 = 600;
const MEMORY_MB: u32 = 512;

pub fn id(environment: &Environment) -> StackId {
    StackId::new(format!("{}LambdaStack", naming::stack_prefix(environment)))
}

/// Declares the analysis function: custom runtime, bound to the upstream
/// role, configured with both API credentials and the result bucket.
///
/// The artifact is not checked here; a missing package surfaces as an
/// apply-time failure from the backend.
pub fn compute_stack(config: &RunConfig, bucket_name: &str, role_name: &str) -> StackNode {
    let function_name = naming::function_name(&config.environment);

    let mut env = BTreeMap::new();
    env.insert("FRED_API_KEY".to_string(), config.fred_api_key.clone());
    env.insert(
        "ALPHA_VANTAGE_API_KEY".to_string(),
        config.alpha_vantage_api_key.clone(),
    );
    env.insert("S3_BUCKET".to_string(), bucket_name.to_string());

    let mut node = StackNode::new(id(&config.environment));
    node.depends_on.push(access::id(&config.environment));
    node.depends_on.push(storage::id(&config.environment));
    node.resources.push(ResourceSpec {
        logical_id: FUNCTION_RESOURCE.to_string(),
        kind: ResourceKind::Function(FunctionSpec {
            function_name: function_name.clone(),
            runtime: RUNTIME.to_string(),
            handler: HANDLER.to_string(),
            artifact: PathBuf::from(ARTIFACT_PATH),
            role_name: role_name.to_string(),
            timeout_seconds: TIMEOUT_SECONDS,
            memory_mb: MEMORY_MB,
            env,
            description: "InvertedYieldCurveTrader daily analysis function".to_string(),
        }),
    });
    node.outputs.insert(
        FUNCTION_ARN_OUTPUT.to_string(),
        OutputValue::arn_of(FUNCTION_RESOURCE),
    );
    node.outputs.insert(
        FUNCTION_NAME_OUTPUT.to_string(),
        OutputValue::literal(function_name),
    );
    node
}
