//! Shared-secret gate over HTTP Basic Authentication (RFC 7617).
//!
//! The gate only knows one secret. Any username is accepted as long as the
//! password matches, which lets DevTools clients that can only send
//! `token:<secret>` or `:<secret>` connect alike.

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::headers;

/// Body of the 401 response.
pub const UNAUTHORIZED_BODY: &str = "<html><body><h1>401 Unauthorized</h1></body></html>";

/// Username conventionally sent by DevTools clients along with the secret.
pub const TOKEN_USERNAME: &str = "token";

/// A username and password pair decoded from an Authorization header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    /// Creates a new credential from username and password.
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Decodes the value of an `Authorization: Basic ...` header.
    ///
    /// Returns `None` for any other scheme, invalid base64, a payload that is
    /// not UTF-8, or a payload without a `:` separator. The payload is split
    /// on the first colon, so passwords may contain colons.
    ///
    /// # Example
    ///
    /// ```
    /// use devtools_gate_core::auth::Credential;
    ///
    /// let cred = Credential::from_header("Basic dG9rZW46czNjcjN0").unwrap();
    /// assert_eq!(cred.username(), "token");
    /// assert_eq!(cred.password(), "s3cr3t");
    /// ```
    pub fn from_header(auth_header: &str) -> Option<Self> {
        let encoded = auth_header.strip_prefix("Basic ")?;
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some(Self::new(user.to_string(), password.to_string()))
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks the credential against the shared secret.
    ///
    /// Accepts `token:<secret>`, `:<secret>` and `<anything>:<secret>`. The
    /// last rule covers the first two; all three are evaluated so that the
    /// accepted forms stay visible here.
    pub fn matches_secret(&self, secret: &str) -> bool {
        let password_ok = constant_time_eq(self.password.as_bytes(), secret.as_bytes());

        let token_user = self.username == TOKEN_USERNAME && password_ok;
        let empty_user = self.username.is_empty() && password_ok;
        let any_user = password_ok;

        token_user || empty_user || any_user
    }
}

/// Decides whether a request may pass the gate.
///
/// With no secret (or an empty one) every request is allowed, whatever its
/// headers. Otherwise the Authorization header must carry a Basic credential
/// whose password equals the secret. Malformed headers are denied, never
/// reported as errors.
///
/// # Example
///
/// ```
/// use devtools_gate_core::auth::authorize;
///
/// assert!(authorize(None, None));
/// assert!(!authorize(None, Some("s3cr3t")));
/// assert!(authorize(Some("Basic dG9rZW46czNjcjN0"), Some("s3cr3t")));
/// ```
pub fn authorize(auth_header: Option<&str>, secret: Option<&str>) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return true;
    };

    auth_header
        .and_then(Credential::from_header)
        .is_some_and(|cred| cred.matches_secret(secret))
}

/// Builds the 401 challenge sent when [`authorize`] denies a request.
pub fn unauthorized_response(realm: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(headers::WWW_AUTHENTICATE, format!("Basic realm=\"{realm}\""))
        .header(headers::CONTENT_TYPE, "text/html")
        .body(Full::new(Bytes::from_static(UNAUTHORIZED_BODY.as_bytes())))
        .unwrap_or_else(|_| {
            // A realm with control characters is not a valid header value
            let mut response = Response::new(Full::new(Bytes::from_static(
                UNAUTHORIZED_BODY.as_bytes(),
            )));
            *response.status_mut() = StatusCode::UNAUTHORIZED;
            response
        })
}

/// Constant-time byte comparison.
/// Does not leak length information through timing.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len_eq = a.len() == b.len();
    let max_len = a.len().max(b.len());
    let mut result = 0u8;

    for i in 0..max_len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        result |= x ^ y;
    }

    len_eq && result == 0
}
