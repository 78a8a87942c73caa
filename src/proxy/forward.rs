use super::headers::{filter_response_headers, prepare_request_headers};
use super::rules::ForwardTarget;
use crate::error::{ForwardError, GatewayError, Result};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{redirect, Client, Method};
use std::time::Duration;
use tracing::debug;

/// Upstream answer, ready to relay.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Executes forwards decided by the proxy table.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Redirects are relayed to the browser, not followed.
        // Targets are reached directly; HTTP_PROXY and friends are ignored.
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| GatewayError::Forward(ForwardError::Upstream(e.to_string())))?;

        Ok(Self { client })
    }

    pub async fn forward(
        &self,
        target: &ForwardTarget,
        method: &str,
        inbound_headers: &HeaderMap,
        body: Bytes,
    ) -> std::result::Result<ForwardedResponse, ForwardError> {
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|e| ForwardError::InvalidRequest(format!("invalid method '{method}': {e}")))?;

        let headers = prepare_request_headers(inbound_headers, target);

        debug!(
            "Forwarding {} {} (rule {}, credentials: {})",
            method, target.url, target.path_prefix, target.forward_credentials
        );

        let mut request = self.client.request(method.clone(), &target.url).headers(headers);
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = filter_response_headers(response.headers());
        let body = response.bytes().await?;

        debug!("Upstream answered {} for {} {}", status, method, target.url);

        Ok(ForwardedResponse {
            status,
            headers,
            body,
        })
    }
}
