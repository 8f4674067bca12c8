//! Schedule stack: the daily trigger rule.

use trader_infra_config::RunConfig;
use trader_infra_core::naming;
use trader_infra_core::resources::{CronSchedule, ResourceKind, ResourceSpec, RuleSpec};
use trader_infra_core::{Environment, OutputValue, StackId, StackNode};

use crate::compute;

pub const RULE_RESOURCE: &str = "DailyTriggerRule";
pub const RULE_ARN_OUTPUT: &str = "RuleArn";
pub const RULE_NAME_OUTPUT: &str = "RuleName";

pub fn id(environment: &Environment) -> StackId {
    StackId::new(format!(
        "{}EventBridgeStack",
        naming::stack_prefix(environment)
    ))
}

/// Declares the fixed daily trigger (12:00 UTC) with the compute function
/// as its sole target.
pub fn schedule_stack(config: &RunConfig, function_name: &str) -> StackNode {
    let rule_name = naming::rule_name(&config.environment);

    let mut node = StackNode::new(id(&config.environment));
    node.depends_on.push(compute::id(&config.environment));
    node.resources.push(ResourceSpec {
        logical_id: RULE_RESOURCE.to_string(),
        kind: ResourceKind::Rule(RuleSpec {
            rule_name: rule_name.clone(),
            schedule: CronSchedule::daily_noon_utc(),
            description: "Daily trigger for InvertedYieldCurveTrader analysis".to_string(),
            target_function: function_name.to_string(),
        }),
    });
    node.outputs.insert(
        RULE_ARN_OUTPUT.to_string(),
        OutputValue::arn_of(RULE_RESOURCE),
    );
    node.outputs.insert(
        RULE_NAME_OUTPUT.to_string(),
        OutputValue::literal(rule_name),
    );
    node
}
