//! Blocking transport seam for solver requests.
//!
//! Transports stay synchronous and runtime-agnostic; the session model is
//! single-threaded and the single-flight guard ensures only one request exists at
//! a time, so there is nothing to multiplex. Timeout behavior belongs to the
//! transport; any transport failure is terminal for that request.

use mathpad_core::RequestKind;
use serde_json::Value;
use thiserror::Error;

/// A terminal transport failure (network, timeout, non-2xx, unparseable body).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not complete.
    #[error("solver request failed: {0}")]
    Failed(String),
    /// The solver answered with a non-success HTTP status.
    #[error("solver returned HTTP status {0}")]
    Status(u16),
}

/// The URL path serving a request kind.
pub fn endpoint(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Hint => "/hint",
        RequestKind::Step => "/step",
        RequestKind::Validate => "/validate",
        RequestKind::Answer => "/answer",
    }
}

/// A blocking solver transport.
///
/// `post` sends the full current buffer text as the request payload and returns
/// the parsed JSON reply. `Ok(None)` models a falsy or absent response body,
/// which the client silently ignores; malformed JSON is a transport failure.
pub trait SolverTransport {
    /// Issue one request and wait for its reply.
    fn post(&mut self, kind: RequestKind, buffer: &str) -> Result<Option<Value>, TransportError>;
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::{SolverTransport, TransportError, endpoint};
    use mathpad_core::RequestKind;
    use serde_json::Value;
    use std::time::Duration;

    /// HTTP transport posting the buffer as a `data` form field, the shape the
    /// reference solver backend expects.
    pub struct HttpTransport {
        base_url: String,
        timeout: Duration,
    }

    impl HttpTransport {
        /// Create a transport for a solver served at `base_url`
        /// (e.g. `http://localhost:8888/math.py`).
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into(),
                timeout: Duration::from_secs(10),
            }
        }

        /// Override the per-request timeout.
        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }
    }

    impl SolverTransport for HttpTransport {
        fn post(
            &mut self,
            kind: RequestKind,
            buffer: &str,
        ) -> Result<Option<Value>, TransportError> {
            let url = format!("{}{}", self.base_url, endpoint(kind));
            tracing::debug!(%url, "posting solver request");

            let response = ureq::post(&url)
                .timeout(self.timeout)
                .send_form(&[("data", buffer)])
                .map_err(|err| match err {
                    ureq::Error::Status(code, _) => TransportError::Status(code),
                    other => TransportError::Failed(other.to_string()),
                })?;

            let body = response
                .into_string()
                .map_err(|err| TransportError::Failed(err.to_string()))?;

            if body.trim().is_empty() {
                return Ok(None);
            }

            let value: Value = serde_json::from_str(&body)
                .map_err(|err| TransportError::Failed(format!("invalid reply JSON: {err}")))?;

            if value.is_null() {
                return Ok(None);
            }
            Ok(Some(value))
        }
    }
}
