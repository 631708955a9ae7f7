//! Per-request pipeline of the gate.
//!
//! # Architecture
//!
//! Every request goes through the same steps:
//! 1. Reject methods other than GET, POST, PUT, DELETE and HEAD (501)
//! 2. Check the Basic credential against the shared secret (401 on denial)
//! 3. Forward the request upstream and relay the answer (502 on failure)
//!
//! Exactly one response is produced per request and nothing is retried.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::GateError;
use crate::types::ConfigProvider;
use crate::{auth, forwarder, headers};

/// Handles an incoming HTTP request through the gate pipeline.
///
/// # Arguments
///
/// * `req` - The incoming HTTP request
/// * `config` - Configuration provider for all settings
/// * `http_client` - HTTP client used to reach the upstream
///
/// # Returns
///
/// Always returns `Ok` with either the relayed upstream response or an
/// error response (401, 501, 502).
pub async fn handle_request<B, C>(
    req: Request<B>,
    config: Arc<C>,
    http_client: reqwest::Client,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
    C: ConfigProvider,
{
    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), |pq| pq.as_str().to_string());

    if !is_method_supported(&method) {
        let err = GateError::MethodNotImplemented(method.to_string());
        debug!(%method, %path, "Rejected unsupported method");
        return Ok(error_response(&err));
    }

    let auth_header = req
        .headers()
        .get(headers::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !auth::authorize(auth_header, config.secret()) {
        debug!(%method, %path, "Authorization denied");
        return Ok(auth::unauthorized_response(config.auth_realm()));
    }

    match forwarder::forward(req, config.as_ref(), &http_client).await {
        Ok(response) => {
            debug!(%method, %path, status = response.status().as_u16(), "Relayed");
            Ok(response)
        }
        Err(err) => {
            if err.is_server_error() {
                warn!(%method, %path, error = %err, "Forwarding failed");
            }
            Ok(error_response(&err))
        }
    }
}

/// Converts a [`GateError`] into the response sent to the client.
///
/// 401 responses carry the challenge header, see
/// [`auth::unauthorized_response`]; here they fall back to a plain body.
pub fn error_response(err: &GateError) -> Response<Full<Bytes>> {
    let message = match err {
        GateError::MethodNotImplemented(_) => format!("Not Implemented: {err}"),
        _ => err.to_string(),
    };
    create_error_response(err.status_code(), &message)
}

/// Creates a standardized error response.
///
/// Builds an HTTP response with the given status code and plain text message.
/// Falls back to a bare response if building fails.
///
/// # Example
///
/// ```
/// use devtools_gate_core::request_handler::create_error_response;
/// use hyper::StatusCode;
///
/// let response = create_error_response(StatusCode::BAD_GATEWAY, "Proxy error: refused");
/// assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
/// ```
pub fn create_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(headers::CONTENT_TYPE, "text/plain")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from(message.to_string()))))
}

/// Check if the HTTP method is answered by the gate
fn is_method_supported(method: &Method) -> bool {
    [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
    ]
    .contains(method)
}
