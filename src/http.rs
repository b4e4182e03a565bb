//! Blocking HTTP transport.
//!
//! The mirror pipeline talks to the network only through [`Fetch`], so the
//! transport can be swapped for an in-memory double in tests.

use std::time::Duration;

use crate::debug;

/// A completed HTTP exchange.
///
/// Non-success statuses are returned as responses, not errors; callers
/// decide what counts as failure.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Transport-level failure (DNS, connect, timeout, body read).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Minimal GET-only HTTP client.
pub trait Fetch {
    /// Issue a GET, optionally sending a `User-Agent` header.
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<FetchResponse, TransportError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<FetchResponse, TransportError> {
        (**self).get(url, user_agent)
    }
}

/// `ureq`-backed client with a global per-request timeout.
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<FetchResponse, TransportError> {
        debug!("http"; "GET {}", url);

        let mut request = self.agent.get(url);
        if let Some(ua) = user_agent {
            request = request.header("User-Agent", ua);
        }

        let mut response = request.call().map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(FetchResponse { status, body })
    }
}

// ============================================================================
// Test Helpers (available to all modules via `crate::http::test_support`)
// ============================================================================
