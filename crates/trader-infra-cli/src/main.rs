//! trader-infra binary: plan the provisioning graph, optionally resolving
//! exports through the dry-run backend.
//!
//! Flags are explicit overrides only; env-var fallback and defaults live
//! in the resolver, so precedence is explicit > env > default throughout.

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trader_infra_backend::DryRunBackend;
use trader_infra_config::RunConfigResolver;
use trader_infra_core::resources::RemovalPolicy;
use trader_infra_orchestrator::{Orchestrator, plan};

#[derive(Parser)]
#[command(name = "trader-infra")]
#[command(about = "Provisioning graph for the InvertedYieldCurveTrader job", long_about = None)]
struct Cli {
    /// Target environment (falls back to ENVIRONMENT, then "dev")
    #[arg(long)]
    environment: Option<String>,

    /// Target region (falls back to AWS_REGION, then "us-east-1")
    #[arg(long)]
    region: Option<String>,

    /// FRED API key (falls back to FRED_API_KEY)
    #[arg(long)]
    fred_api_key: Option<String>,

    /// Alpha Vantage API key (falls back to ALPHA_VANTAGE_API_KEY)
    #[arg(long)]
    alpha_vantage_api_key: Option<String>,

    /// Allow the result bucket to be destroyed on stack teardown
    #[arg(long)]
    destroyable_storage: bool,

    /// Resolve exports through the dry-run backend instead of only planning
    #[arg(long)]
    apply: bool,

    /// Emit JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut resolver = RunConfigResolver::from_process_env();
    if let Some(environment) = cli.environment {
        resolver = resolver.with_environment(environment);
    }
    if let Some(region) = cli.region {
        resolver = resolver.with_region(region);
    }
    if let Some(key) = cli.fred_api_key {
        resolver = resolver.with_fred_api_key(key);
    }
    if let Some(key) = cli.alpha_vantage_api_key {
        resolver = resolver.with_alpha_vantage_api_key(key);
    }
    if cli.destroyable_storage {
        resolver = resolver.with_storage_removal(RemovalPolicy::Destroy);
    }

    let config = resolver.resolve()?;
    info!(environment = %config.environment, region = %config.region, "configuration resolved");

    if cli.apply {
        let backend = Arc::new(DryRunBackend::new(config.region.clone()));
        let orchestrator = Orchestrator::new(backend);
        let outputs = orchestrator.run(&config).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&outputs.exports)?);
        } else {
            for (key, value) in &outputs.exports {
                println!("{key} = {value}");
            }
        }
    } else {
        let graph = plan(&config)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&graph)?);
        } else {
            for node in graph.nodes() {
                println!("{} ({} resources)", node.id, node.resources.len());
                for name in node.outputs.keys() {
                    println!("  exports {}", node.export_key(name));
                }
            }
        }
    }

    Ok(())
}
