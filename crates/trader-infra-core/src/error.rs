//! Error types for trader-infra.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error("duplicate stack id: {0}")]
    DuplicateStack(String),

    #[error("duplicate export key: {0}")]
    DuplicateExport(String),

    #[error("unresolved cross-stack reference: stack {stack_id} has no usable output {output}")]
    UnresolvedReference { stack_id: String, output: String },

    #[error("forward reference: {from} depends on {to}, which is not built yet")]
    ForwardReference { from: String, to: String },

    #[error("cycle detected in stack dependencies at {0}")]
    Cycle(String),

    #[error("stack {stack_id} exports an attribute of unknown resource {resource}")]
    UnknownResource { stack_id: String, resource: String },

    #[error("name conflict: {0}")]
    NameConflict(String),

    #[error("apply failed: {0}")]
    Apply(String),
}

pub type Result<T> = std::result::Result<T, Error>;
