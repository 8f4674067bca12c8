//! Declarative resource specs.
//!
//! A spec is plain data describing a single resource for the provisioning
//! backend to reconcile. Building a spec never talks to a backend; the
//! backend owns resource lifetimes, including apply-time failures such as a
//! missing deployment artifact.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A resource declared by a stack, addressed by a logical id that is unique
/// within its stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub logical_id: String,
    #[serde(flatten)]
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceKind {
    Bucket(BucketSpec),
    Role(RoleSpec),
    Function(FunctionSpec),
    Rule(RuleSpec),
}

impl ResourceSpec {
    /// The physical name the backend will assign.
    pub fn physical_name(&self) -> &str {
        match &self.kind {
            ResourceKind::Bucket(spec) => &spec.bucket_name,
            ResourceKind::Role(spec) => &spec.role_name,
            ResourceKind::Function(spec) => &spec.function_name,
            ResourceKind::Rule(spec) => &spec.rule_name,
        }
    }

    /// The ARN the backend would assign, given a region and account.
    pub fn arn(&self, region: &str, account: &str) -> String {
        match &self.kind {
            ResourceKind::Bucket(spec) => format!("arn:aws:s3:::{}", spec.bucket_name),
            ResourceKind::Role(spec) => {
                format!("arn:aws:iam::{account}:role/{}", spec.role_name)
            }
            ResourceKind::Function(spec) => {
                format!(
                    "arn:aws:lambda:{region}:{account}:function:{}",
                    spec.function_name
                )
            }
            ResourceKind::Rule(spec) => {
                format!("arn:aws:events:{region}:{account}:rule/{}", spec.rule_name)
            }
        }
    }
}

/// What happens to a resource when its stack is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Resource and its data survive stack teardown.
    Retain,
    /// Resource is deleted with the stack.
    Destroy,
}

impl std::fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalPolicy::Retain => write!(f, "retain"),
            RemovalPolicy::Destroy => write!(f, "destroy"),
        }
    }
}

/// Server-side encryption mode for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketEncryption {
    S3Managed,
    KmsManaged,
}

/// A versioned, encrypted object storage bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub bucket_name: String,
    pub versioned: bool,
    pub encryption: BucketEncryption,
    /// Block every form of public access.
    pub block_public_access: bool,
    /// Reject requests over insecure transport.
    pub enforce_ssl: bool,
    pub removal_policy: RemovalPolicy,
}

/// Effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// A single least-privilege policy statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

/// An execution identity assumable by a single service principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub role_name: String,
    /// Service principal allowed to assume this role.
    pub assumed_by: String,
    pub description: String,
    /// Managed policy names attached to the role.
    pub managed_policies: Vec<String>,
    /// Inline statements scoped to specific resources.
    pub statements: Vec<PolicyStatement>,
}

/// A serverless compute function deployed from a pre-built artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub function_name: String,
    pub runtime: String,
    pub handler: String,
    /// Relative path to the deployable package. Existence is checked by the
    /// backend at apply time, not here.
    pub artifact: PathBuf,
    /// Name of the execution role the function assumes.
    pub role_name: String,
    pub timeout_seconds: u32,
    pub memory_mb: u32,
    /// Environment variables, ordered for deterministic serialization.
    pub env: BTreeMap<String, String>,
    pub description: String,
}

/// Six-field schedule expression
/// (minutes, hours, day-of-month, month, day-of-week, year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronSchedule {
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub month: String,
    pub week_day: String,
    pub year: String,
}

impl CronSchedule {
    /// Fires exactly once per UTC calendar day, at 12:00.
    pub fn daily_noon_utc() -> Self {
        Self {
            minute: "0".to_string(),
            hour: "12".to_string(),
            day: "?".to_string(),
            month: "*".to_string(),
            week_day: "*".to_string(),
            year: "*".to_string(),
        }
    }

    pub fn expression(&self) -> String {
        format!(
            "cron({} {} {} {} {} {})",
            self.minute, self.hour, self.day, self.month, self.week_day, self.year
        )
    }
}

/// A time-based rule invoking a single target function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub rule_name: String,
    pub schedule: CronSchedule,
    pub description: String,
    /// Name of the function this rule invokes. Delivery is at-least-once;
    /// idempotency is the target's concern.
    pub target_function: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_cron_expression() {
        let schedule = CronSchedule::daily_noon_utc();
        assert_eq!(schedule.expression(), "cron(0 12 ? * * *)");
        assert_eq!(schedule.minute, "0");
        assert_eq!(schedule.hour, "12");
    }

    #[test]
    fn test_arn_formats() {
        let bucket = ResourceSpec {
            logical_id: "DataBucket".to_string(),
            kind: ResourceKind::Bucket(BucketSpec {
                bucket_name: "my-bucket".to_string(),
                versioned: true,
                encryption: BucketEncryption::S3Managed,
                block_public_access: true,
                enforce_ssl: true,
                removal_policy: RemovalPolicy::Retain,
            }),
        };
        assert_eq!(bucket.arn("us-east-1", "123"), "arn:aws:s3:::my-bucket");

        let role = ResourceSpec {
            logical_id: "Role".to_string(),
            kind: ResourceKind::Role(RoleSpec {
                role_name: "my-role".to_string(),
                assumed_by: "lambda.amazonaws.com".to_string(),
                description: String::new(),
                managed_policies: vec![],
                statements: vec![],
            }),
        };
        assert_eq!(role.arn("us-east-1", "123"), "arn:aws:iam::123:role/my-role");
    }

    #[test]
    fn test_resource_spec_serde_round_trip() {
        let spec = ResourceSpec {
            logical_id: "DailyTriggerRule".to_string(),
            kind: ResourceKind::Rule(RuleSpec {
                rule_name: "MyRule".to_string(),
                schedule: CronSchedule::daily_noon_utc(),
                description: "daily".to_string(),
                target_function: "MyFn".to_string(),
            }),
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: ResourceSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
