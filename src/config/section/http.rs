//! `[http]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [http]
//! user_agent = "Mozilla/5.0 ..."   # Sent with stylesheet requests
//! timeout = 10                     # Per-request timeout in seconds
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::mirror::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

/// Outgoing request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent for the CSS API. The API picks its output format from it.
    pub user_agent: String,

    /// Timeout in seconds for every request.
    pub timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    pub const USER_AGENT: FieldPath = FieldPath::new("http.user_agent");
    pub const TIMEOUT: FieldPath = FieldPath::new("http.timeout");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.user_agent.trim().is_empty() {
            diag.error(Self::USER_AGENT, "user agent must not be empty");
        }
        if self.timeout == 0 {
            diag.error(Self::TIMEOUT, "timeout must be at least 1 second");
        }
    }
}
