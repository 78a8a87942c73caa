use crate::config::DevServerConfig;
use crate::error::{GatewayError, Result};
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::fs::File;
use warp::Filter;

pub mod api;
pub mod proxy;

#[cfg(test)]
mod api_tests;

pub async fn start_server(state: Arc<AppState>) -> Result<()> {
    let addr = bind_address(&state.config.dev_server).await?;

    tracing::info!("Starting dev server on {}", addr);
    for rule in state.proxy_table.rules() {
        tracing::info!(
            "Proxy rule {} -> {} (changeOrigin: {}, credentials: {})",
            rule.path_prefix(),
            rule.target(),
            rule.change_origin(),
            rule.forward_credentials()
        );
    }

    let routes = routes(state.clone());

    let mut shutdown_rx = state.shutdown_tx.subscribe();
    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async move {
            let _ = shutdown_rx.recv().await;
        })
        .map_err(|e| GatewayError::Server(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Dev server listening on http://{}", bound);
    server.await;

    tracing::info!("Dev server stopped");
    Ok(())
}

async fn bind_address(config: &DevServerConfig) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((config.bind_address.as_str(), config.port)).await?;
    addrs.next().ok_or_else(|| {
        GatewayError::Server(format!(
            "Bind address '{}' did not resolve",
            config.bind_address
        ))
    })
}

/// Gateway endpoints first, then forwarding, then the client's static files.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let static_files = static_routes(&state.config.dev_server);

    api::routes(state.clone())
        .or(proxy::route(state))
        .or(static_files)
        .with(warp::trace::request())
}

fn static_routes(config: &DevServerConfig) -> BoxedFilter<(File,)> {
    let files = warp::fs::dir(config.static_dir.clone());

    if config.spa_fallback {
        // History-mode client routes resolve to the index document
        let index = warp::get().and(warp::fs::file(config.index_path()));
        files.or(index).unify().boxed()
    } else {
        files.boxed()
    }
}
