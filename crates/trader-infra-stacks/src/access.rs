//! Execution-identity stack: the role the compute function assumes.

use trader_infra_config::RunConfig;
use trader_infra_core::naming;
use trader_infra_core::resources::{
    Effect, PolicyStatement, ResourceKind, ResourceSpec, RoleSpec,
};
use trader_infra_core::{Environment, OutputValue, StackId, StackNode};

use crate::storage;

pub const ROLE_RESOURCE: &str = "LambdaExecutionRole";
pub const ROLE_ARN_OUTPUT: &str = "RoleArn";
pub const ROLE_NAME_OUTPUT: &str = "RoleName";

const LAMBDA_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";
const BASIC_EXECUTION_POLICY: &str = "service-role/AWSLambdaBasicExecutionRole";

pub fn id(environment: &Environment) -> StackId {
    StackId::new(format!("{}IamStack", naming::stack_prefix(environment)))
}

/// Declares the execution role, scoped to objects in the given bucket.
///
/// The inline statement covers read and write object operations on the one
/// bucket produced upstream, never bucket-level or account-level storage
/// permissions.
pub fn access_stack(config: &RunConfig, bucket_name: &str) -> StackNode {
    let role_name = naming::role_name(&config.environment);

    let mut node = StackNode::new(id(&config.environment));
    node.depends_on.push(storage::id(&config.environment));
    node.resources.push(ResourceSpec {
        logical_id: ROLE_RESOURCE.to_string(),
        kind: ResourceKind::Role(RoleSpec {
            role_name: role_name.clone(),
            assumed_by: LAMBDA_SERVICE_PRINCIPAL.to_string(),
            description: "Execution role for InvertedYieldCurveTrader Lambda".to_string(),
            managed_policies: vec![BASIC_EXECUTION_POLICY.to_string()],
            statements: vec![PolicyStatement {
                effect: Effect::Allow,
                actions: vec!["s3:PutObject".to_string(), "s3:GetObject".to_string()],
                resources: vec![format!("arn:aws:s3:::{bucket_name}/*")],
            }],
        }),
    });
    node.outputs.insert(
        ROLE_ARN_OUTPUT.to_string(),
        OutputValue::arn_of(ROLE_RESOURCE),
    );
    node.outputs.insert(
        ROLE_NAME_OUTPUT.to_string(),
        OutputValue::literal(role_name),
    );
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::dev_config;

    #[test]
    fn test_role_name_and_exports() {
        let node = access_stack(&dev_config(), "inverted-yield-trader-dev-results");
        assert_eq!(node.id.as_str(), "InvertedYieldTraderDevIamStack");
        assert_eq!(node.depends_on, vec![StackId::from("InvertedYieldTraderDevS3Stack")]);
        assert_eq!(
            node.outputs.get(ROLE_ARN_OUTPUT),
            Some(&OutputValue::arn_of(ROLE_RESOURCE))
        );
        assert_eq!(
            node.outputs.get(ROLE_NAME_OUTPUT),
            Some(&OutputValue::literal("inverted-yield-trader-dev-lambda-role"))
        );
    }

    #[test]
    fn test_role_is_assumable_only_by_lambda() {
        let node = access_stack(&dev_config(), "bucket");
        let ResourceKind::Role(role) = &node.resource(ROLE_RESOURCE).unwrap().kind else {
            panic!("expected a role spec");
        };
        assert_eq!(role.assumed_by, "lambda.amazonaws.com");
        assert_eq!(
            role.managed_policies,
            vec!["service-role/AWSLambdaBasicExecutionRole"]
        );
    }

    #[test]
    fn test_policy_is_scoped_to_the_one_bucket() {
        let node = access_stack(&dev_config(), "inverted-yield-trader-dev-results");
        let ResourceKind::Role(role) = &node.resource(ROLE_RESOURCE).unwrap().kind else {
            panic!("expected a role spec");
        };
        assert_eq!(role.statements.len(), 1);
        let statement = &role.statements[0];
        assert_eq!(statement.effect, Effect::Allow);
        assert_eq!(statement.actions, vec!["s3:PutObject", "s3:GetObject"]);
        assert_eq!(
            statement.resources,
            vec!["arn:aws:s3:::inverted-yield-trader-dev-results/*"]
        );
    }
}
