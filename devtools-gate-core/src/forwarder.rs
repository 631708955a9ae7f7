//! Forwarding of authorized requests to the internal debugging endpoint.
//!
//! A request is replayed against `http://<target_host>:<target_port>` with the
//! same method, path and query, minus the headers listed in
//! [`headers::STRIPPED_REQUEST_HEADERS`]. The upstream response is read into
//! memory completely before anything is written back to the client.
//!
//! # Blocking
//!
//! Unless an upstream timeout is configured, nothing bounds how long the
//! upstream may take. A hung endpoint holds the client connection open and,
//! with sequential serving, stalls the whole gate.

use std::fmt::Display;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::{Method, Request, Response};
use tracing::debug;

use crate::error::{GateError, Result};
use crate::headers;
use crate::types::{UpstreamErrorPolicy, UpstreamProvider};

/// Builds the HTTP client shared by all forwarded requests.
///
/// Idle upstream connections are not pooled: each forwarded request opens a
/// fresh connection, as the upstream is only ever asked one thing at a time.
pub fn build_client(config: &impl UpstreamProvider) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);

    if let Some(timeout) = config.upstream_timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(GateError::ClientBuild)
}

/// Forwards a request upstream and converts the answer into a client response.
///
/// # Errors
///
/// Returns [`GateError::Upstream`] when the upstream cannot be reached, fails
/// mid-response, or (with [`UpstreamErrorPolicy::Collapse`]) answers with a
/// 4xx/5xx status. Returns [`GateError::Proxy`] when the client body cannot
/// be read or the response cannot be assembled.
pub async fn forward<B>(
    req: Request<B>,
    config: &impl UpstreamProvider,
    client: &reqwest::Client,
) -> Result<Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Display,
{
    let (parts, body) = req.into_parts();

    let destination = config.target_url(parts.uri.path_and_query().map_or("/", |pq| pq.as_str()));
    debug!(method = %parts.method, url = %destination, "Forwarding request");

    let mut upstream_req = client.request(parts.method.clone(), &destination);

    for (name, value) in parts.headers.iter() {
        if headers::is_forwarded_request_header(name.as_str()) {
            upstream_req = upstream_req.header(name.clone(), value.clone());
        }
    }

    if carries_body(&parts.method) {
        let body_bytes = if parts.headers.contains_key(hyper::header::CONTENT_LENGTH) {
            body.collect()
                .await
                .map_err(|e| GateError::Proxy(format!("failed to read request body: {e}")))?
                .to_bytes()
        } else {
            Bytes::new()
        };
        upstream_req = upstream_req.body(body_bytes);
    }

    let mut response = upstream_req.send().await?;
    if config.upstream_error_policy() == UpstreamErrorPolicy::Collapse {
        response = response.error_for_status()?;
    }

    let status = response.status();
    let upstream_headers = response.headers().clone();
    let body_bytes = response.bytes().await?;

    debug!(status = status.as_u16(), bytes = body_bytes.len(), "Upstream responded");

    let mut relayed = Response::builder()
        .status(status)
        .body(Full::new(body_bytes))
        .map_err(|e| GateError::Proxy(format!("failed to build response: {e}")))?;

    for (name, value) in upstream_headers.iter() {
        if headers::is_relayed_response_header(name.as_str()) {
            relayed.headers_mut().append(name.clone(), value.clone());
        }
    }

    Ok(relayed)
}

/// Only POST and PUT bodies are forwarded.
fn carries_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT
}
