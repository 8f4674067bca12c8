//! Provisioning backend implementations for trader-infra.
//!
//! Ships the dry-run backend; a live cloud backend is an external
//! collaborator implementing the same core trait.

pub mod dry_run;

pub use dry_run::DryRunBackend;
pub use trader_infra_core::backend::{ApplyReport, ProvisioningBackend};
