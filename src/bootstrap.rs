//! Startup sequence.
//!
//! Probe the environment, resolve the backend origin, then register the
//! capability set. The resulting [`Runtime`] is immutable and is the only
//! way later components reach the origin, so nothing can read it before it
//! has been resolved.

use crate::config::Config;
use crate::environment::{Classification, EnvironmentContext, EnvironmentProbe};
use crate::error::Result;
use crate::origin::{Origin, OriginResolver};
use crate::registry::CapabilityRegistry;
use std::sync::Arc;
use tracing::info;

/// Resolved startup state shared with everything that issues requests.
pub struct Runtime<C> {
    pub context: EnvironmentContext,
    pub classification: Classification,
    pub api_base_url: Origin,
    pub capabilities: Arc<CapabilityRegistry<C>>,
}

impl<C> Runtime<C> {
    pub fn is_local(&self) -> bool {
        self.classification == Classification::Local
    }

    /// Absolute backend URL for an API or media path.
    pub fn api_url(&self, path: &str) -> String {
        self.api_base_url.join(path)
    }
}

/// Build the probe and resolver described by `config`.
pub fn components(config: &Config) -> Result<(EnvironmentProbe, OriginResolver)> {
    let probe = EnvironmentProbe::new(config.dev_server.hostname.clone(), config.dev_server.port);
    let resolver = OriginResolver::new(Origin::parse(&config.backend.dev_origin)?);
    Ok((probe, resolver))
}

/// Run the startup sequence against an observed page context.
pub fn bootstrap<C, N, I>(
    config: &Config,
    context: EnvironmentContext,
    capabilities: I,
) -> Result<Runtime<C>>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, C)>,
{
    let (probe, resolver) = components(config)?;

    let classification = probe.classify(&context);
    let api_base_url = resolver.resolve(&context, classification);
    info!(
        "Page {} classified as {}, API base URL is {}",
        context, classification, api_base_url
    );

    let registry = CapabilityRegistry::new();
    let registered = registry.register_all(capabilities);
    info!("Registered {} capabilities", registered);

    Ok(Runtime {
        context,
        classification,
        api_base_url,
        capabilities: Arc::new(registry),
    })
}

/// [`bootstrap`] for the page URL configured in `config`.
pub fn bootstrap_from_config<C, N, I>(config: &Config, capabilities: I) -> Result<Runtime<C>>
where
    N: Into<String>,
    I: IntoIterator<Item = (N, C)>,
{
    let context = EnvironmentContext::from_url(&config.dev_server.public_url())?;
    bootstrap(config, context, capabilities)
}
