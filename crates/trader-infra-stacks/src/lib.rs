//! Stack definitions for the trader provisioning graph.
//!
//! Each definition is a pure function from run configuration plus upstream
//! outputs to a [`StackNode`](trader_infra_core::StackNode): it declares
//! resource specs and exports, and nothing here touches a provisioning
//! backend. The orchestrator threads outputs between definitions.

pub mod access;
pub mod compute;
pub mod schedule;
pub mod storage;

pub use access::access_stack;
pub use compute::compute_stack;
pub use schedule::schedule_stack;
pub use storage::storage_stack;

#[cfg(test)]
pub(crate) mod testutil {
    use trader_infra_config::{RunConfig, RunConfigResolver};

    pub fn dev_config() -> RunConfig {
        RunConfigResolver::new()
            .with_environment("dev")
            .with_fred_api_key("fred-key")
            .with_alpha_vantage_api_key("av-key")
            .resolve()
            .unwrap()
    }
}
