use crate::bootstrap;
use crate::config::{self, Config};
use crate::environment::{Classification, EnvironmentContext};
use crate::error::Result;
use crate::proxy::ProxyTable;
use tracing::info;

/// Validate the configuration and report what the gateway would do with it.
pub async fn run_config_check(config: Config) -> Result<()> {
    info!("Checking configuration...");

    config::validate(&config)?;
    info!("✓ Configuration is valid");

    let context = EnvironmentContext::from_url(&config.dev_server.public_url())?;
    let (probe, resolver) = bootstrap::components(&config)?;
    let classification = probe.classify(&context);
    let origin = resolver.resolve(&context, classification);

    info!("Page URL: {}", context);
    info!("Environment: {}", classification);
    info!("API base URL: {}", origin);

    let table = ProxyTable::from_config(&config)?;
    if !config.proxy.enabled {
        info!("Proxy disabled ({} rule(s) configured)", table.rules().len());
    } else if classification != Classification::Local {
        info!("Proxy inert for a deployed page ({} rule(s) configured)", table.rules().len());
    }
    for rule in table.rules() {
        info!(
            "  {} -> {} (changeOrigin: {}, credentials: {})",
            rule.path_prefix(),
            rule.target(),
            rule.change_origin(),
            rule.forward_credentials()
        );
    }

    info!("\n✓ All checks passed");
    Ok(())
}

/// Classify `page_url` and print the origin it resolves to.
pub fn run_resolve(config: &Config, page_url: &str) -> Result<()> {
    let context = EnvironmentContext::from_url(page_url)?;
    let (probe, resolver) = bootstrap::components(config)?;
    let classification = probe.classify(&context);
    let origin = resolver.resolve(&context, classification);

    println!("{}\t{}", classification, origin);
    Ok(())
}
