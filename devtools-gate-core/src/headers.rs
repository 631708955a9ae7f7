//! HTTP header names and the filtering rules applied at each hop.
//!
//! All constants are lowercase, matching how `hyper` normalizes header names.

/// Authorization header carrying the Basic credential.
pub const AUTHORIZATION: &str = "authorization";

/// WWW-Authenticate header (for 401 responses).
pub const WWW_AUTHENTICATE: &str = "www-authenticate";

/// Content-Type header.
pub const CONTENT_TYPE: &str = "content-type";

/// Host header.
pub const HOST: &str = "host";

/// Connection header.
pub const CONNECTION: &str = "connection";

/// Content-Length header.
pub const CONTENT_LENGTH: &str = "content-length";

/// Transfer-Encoding header.
pub const TRANSFER_ENCODING: &str = "transfer-encoding";

/// Request headers never sent to the upstream endpoint.
///
/// The upstream must see a request without the gate's credential, addressed to
/// itself and without the client's connection management.
pub const STRIPPED_REQUEST_HEADERS: &[&str] = &[HOST, AUTHORIZATION, CONNECTION];

/// Body framing headers. The upstream client recomputes these from the
/// body it actually sends.
pub const FRAMING_HEADERS: &[&str] = &[CONTENT_LENGTH, TRANSFER_ENCODING];

/// Response headers never relayed back to the client.
pub const STRIPPED_RESPONSE_HEADERS: &[&str] = &[CONNECTION, TRANSFER_ENCODING];

/// Returns true if a client request header should be copied upstream.
///
/// # Example
///
/// ```
/// use devtools_gate_core::headers::is_forwarded_request_header;
///
/// assert!(is_forwarded_request_header("accept"));
/// assert!(!is_forwarded_request_header("authorization"));
/// ```
pub fn is_forwarded_request_header(name: &str) -> bool {
    !STRIPPED_REQUEST_HEADERS.contains(&name) && !FRAMING_HEADERS.contains(&name)
}

/// Returns true if an upstream response header should be relayed to the client.
pub fn is_relayed_response_header(name: &str) -> bool {
    !STRIPPED_RESPONSE_HEADERS.contains(&name)
}
