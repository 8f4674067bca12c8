//! Result-storage stack: the bucket the analysis job writes to.

use trader_infra_config::RunConfig;
use trader_infra_core::naming;
use trader_infra_core::resources::{BucketEncryption, BucketSpec, ResourceKind, ResourceSpec};
use trader_infra_core::{Environment, OutputValue, StackId, StackNode};

pub const BUCKET_RESOURCE: &str = "DataBucket";
pub const BUCKET_NAME_OUTPUT: &str = "BucketName";

pub fn id(environment: &Environment) -> StackId {
    StackId::new(format!("{}S3Stack", naming::stack_prefix(environment)))
}

/// Declares the versioned, encrypted, private result bucket.
///
/// The removal policy comes from the run configuration so long-lived
/// environments retain data across teardown while ephemeral ones may not.
pub fn storage_stack(config: &RunConfig) -> StackNode {
    let bucket_name = naming::bucket_name(&config.environment);

    let mut node = StackNode::new(id(&config.environment));
    node.resources.push(ResourceSpec {
        logical_id: BUCKET_RESOURCE.to_string(),
        kind: ResourceKind::Bucket(BucketSpec {
            bucket_name: bucket_name.clone(),
            versioned: true,
            encryption: BucketEncryption::S3Managed,
            block_public_access: true,
            enforce_ssl: true,
            removal_policy: config.storage_removal,
        }),
    });
    node.outputs.insert(
        BUCKET_NAME_OUTPUT.to_string(),
        OutputValue::literal(bucket_name),
    );
    node
}
