use crate::bootstrap::Runtime;
use crate::config::Config;
use crate::error::Result;
use crate::proxy::{Forwarder, ProxyTable};
use crate::registry::Icon;
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub config: Arc<Config>,
    pub runtime: Arc<Runtime<Icon>>,
    pub proxy_table: Arc<ProxyTable>,
    pub forwarder: Forwarder,
    pub shutdown_tx: tokio::sync::broadcast::Sender<()>,
}

impl AppState {
    /// Assemble the server state from a finished bootstrap. The proxy table
    /// is only armed for a local page; a deployed page talks to its backend
    /// directly.
    pub fn new(
        config: Config,
        runtime: Runtime<Icon>,
    ) -> Result<(Arc<Self>, tokio::sync::broadcast::Receiver<()>)> {
        let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(16);

        let proxy_table = if config.proxy.enabled && runtime.is_local() {
            ProxyTable::from_config(&config)?
        } else {
            info!(
                "Proxy table inert (enabled: {}, environment: {})",
                config.proxy.enabled, runtime.classification
            );
            ProxyTable::inert()
        };

        let forwarder = Forwarder::new(config.request_timeout())?;

        let state = Arc::new(Self {
            config: Arc::new(config),
            runtime: Arc::new(runtime),
            proxy_table: Arc::new(proxy_table),
            forwarder,
            shutdown_tx,
        });

        Ok((state, shutdown_rx))
    }

    pub async fn shutdown(&self) {
        info!("Initiating gateway shutdown");
        let _ = self.shutdown_tx.send(());
    }
}
