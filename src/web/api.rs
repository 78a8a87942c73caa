use crate::state::AppState;
use serde_json::json;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Endpoints served by the gateway itself under `/__devgate`.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let bootstrap_json = warp::path!("bootstrap.json")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(bootstrap_json);

    let bootstrap_js = warp::path!("bootstrap.js")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(bootstrap_js);

    let icon = warp::path!("icons" / String)
        .and(warp::get())
        .and(with_state(state))
        .and_then(get_icon);

    let health = warp::path!("health").and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "status": "healthy",
            "service": "spa-devgate"
        }))
    });

    warp::path("__devgate").and(bootstrap_json.or(bootstrap_js).or(icon).or(health))
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn bootstrap_json(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let runtime = &state.runtime;
    Ok(warp::reply::json(&json!({
        "apiBaseUrl": runtime.api_base_url,
        "environment": runtime.classification,
        "page": runtime.context.to_string(),
        "capabilities": runtime.capabilities.names(),
        "proxyRules": state.proxy_table.rules(),
    })))
}

/// Script the index document loads before the client bundle so that
/// `window.API_BASE_URL` is set before any request is issued.
async fn bootstrap_js(state: Arc<AppState>) -> Result<impl Reply, Rejection> {
    let origin = serde_json::to_string(state.runtime.api_base_url.as_str())
        .map_err(|e| warp::reject::custom(crate::error::GatewayError::Serialization(e)))?;
    let script = format!("window.API_BASE_URL = {};\n", origin);

    let reply = warp::reply::with_header(script, "content-type", "application/javascript");
    Ok(warp::reply::with_header(reply, "cache-control", "no-store"))
}

async fn get_icon(file: String, state: Arc<AppState>) -> Result<Box<dyn Reply>, Rejection> {
    let icon = file
        .strip_suffix(".svg")
        .and_then(|name| state.runtime.capabilities.resolve(name));

    match icon {
        Some(icon) => Ok(Box::new(warp::reply::with_header(
            icon.svg(),
            "content-type",
            "image/svg+xml",
        ))),
        None => Ok(Box::new(warp::reply::with_status(
            warp::reply::json(&json!({
                "error": format!("Unknown capability: {}", file)
            })),
            StatusCode::NOT_FOUND,
        ))),
    }
}
