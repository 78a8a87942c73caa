use crate::error::ForwardError;
use crate::proxy::{ForwardTarget, Route};
use crate::state::AppState;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use reqwest::header::{HeaderMap as ClientHeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use warp::http::header::CONTENT_LENGTH;
use warp::http::{HeaderMap, Method, Response, StatusCode};
use warp::hyper::Body;
use warp::path::FullPath;
use warp::{Filter, Rejection};

/// Requests claimed by the proxy table; everything else is rejected so the
/// next filter can serve it.
pub fn route(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Response<Body>,), Error = Rejection> + Clone {
    let query = warp::query::raw()
        .map(|query: String| Some(query))
        .or(warp::any().map(|| None::<String>))
        .unify();

    warp::path::full()
        .and(query)
        .and(with_state(state.clone()))
        .and_then(match_rule)
        .and(warp::method())
        .and(warp::header::headers_cloned())
        .and(warp::body::stream())
        .and(with_state(state))
        .and_then(forward_request)
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn match_rule(
    path: FullPath,
    query: Option<String>,
    state: Arc<AppState>,
) -> Result<ForwardTarget, Rejection> {
    match state.proxy_table.route(path.as_str(), query.as_deref()) {
        Route::Forward(target) => Ok(target),
        Route::PassThrough => Err(warp::reject::not_found()),
    }
}

async fn forward_request<S, B>(
    target: ForwardTarget,
    method: Method,
    headers: HeaderMap,
    body: S,
    state: Arc<AppState>,
) -> Result<Response<Body>, Rejection>
where
    S: Stream<Item = Result<B, warp::Error>> + Send + 'static,
    B: Buf + Send,
{
    let limit = state.config.proxy.max_body_bytes;

    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if declared.map_or(false, |len| len > limit) {
        return Ok(too_large(&target, limit));
    }

    let body = match read_limited(body, limit).await {
        Ok(Some(body)) => body,
        Ok(None) => return Ok(too_large(&target, limit)),
        Err(e) => {
            tracing::warn!("Reading request body for {} failed: {}", target.url, e);
            return Ok(plain_response(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    let inbound = to_client_headers(&headers);

    let forwarded = match state
        .forwarder
        .forward(&target, method.as_str(), &inbound, body)
        .await
    {
        Ok(forwarded) => forwarded,
        Err(e) => {
            tracing::warn!("Forwarding {} {} failed: {}", method, target.url, e);
            let status = match e {
                ForwardError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ForwardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ForwardError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
            return Ok(plain_response(status, e.to_string()));
        }
    };

    let mut builder = Response::builder().status(forwarded.status);
    for (name, value) in forwarded.headers.iter() {
        builder = builder.header(name.as_str(), value.as_bytes());
    }

    match builder.body(Body::from(forwarded.body)) {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::warn!("Upstream response for {} could not be relayed: {}", target.url, e);
            Ok(plain_response(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

/// Buffer the request body, giving up once it exceeds `limit` bytes.
async fn read_limited<S, B>(body: S, limit: u64) -> Result<Option<Bytes>, warp::Error>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let mut body = Box::pin(body);
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.try_next().await? {
        if (buf.len() + chunk.remaining()) as u64 > limit {
            return Ok(None);
        }
        buf.put(chunk);
    }
    Ok(Some(buf.freeze()))
}

fn too_large(target: &ForwardTarget, limit: u64) -> Response<Body> {
    tracing::warn!("Request body for {} exceeds {} bytes", target.url, limit);
    plain_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("Request body exceeds {} bytes", limit),
    )
}

fn plain_response(status: StatusCode, message: String) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}

/// warp and reqwest carry different `http` crate versions.
fn to_client_headers(headers: &HeaderMap) -> ClientHeaderMap {
    let mut out = ClientHeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            out.append(name, value);
        }
    }
    out
}
