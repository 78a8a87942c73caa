//! Environment probe.
//!
//! Captures where the client page is being served from and decides whether
//! that is the local development endpoint or a deployed build.

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;
use url::Url;

pub const DEFAULT_DEV_HOSTNAME: &str = "localhost";
pub const DEFAULT_DEV_PORT: u16 = 5173;

/// The observed location of the page: scheme, hostname and an explicit
/// port. A port equal to the scheme default is recorded as absent, the same
/// way `window.location.port` reports an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentContext {
    scheme: String,
    hostname: String,
    port: Option<u16>,
}

impl EnvironmentContext {
    pub fn from_url(input: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(input.trim())
            .map_err(|e| ConfigError::Parse(format!("Invalid page URL '{input}': {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Parse(format!(
                "Page URL '{input}' must use http or https"
            )));
        }
        let hostname = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::Parse(format!("Page URL '{input}' has no host")))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            hostname: hostname.to_string(),
            port: url.port(),
        })
    }

    /// Build from the three `window.location` fields. `protocol` may carry the
    /// trailing colon (`"https:"`); an empty `port` means the scheme default.
    pub fn from_parts(protocol: &str, hostname: &str, port: &str) -> Result<Self, ConfigError> {
        let scheme = protocol.trim().trim_end_matches(':');
        let authority = if port.is_empty() {
            hostname.to_string()
        } else {
            format!("{hostname}:{port}")
        };
        Self::from_url(&format!("{scheme}://{authority}/"))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Browser-style protocol, including the trailing colon.
    pub fn protocol(&self) -> String {
        format!("{}:", self.scheme)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `hostname[:port]`
    pub fn host(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.hostname, port),
            None => self.hostname.clone(),
        }
    }
}

impl fmt::Display for EnvironmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Local,
    Deployed,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Local => "local",
            Classification::Deployed => "deployed",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The development endpoint a context is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentProbe {
    hostname: String,
    port: u16,
}

impl EnvironmentProbe {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into().to_ascii_lowercase(),
            port,
        }
    }

    /// `Local` iff both hostname and explicit port match the development
    /// endpoint. A missing port never matches.
    pub fn classify(&self, context: &EnvironmentContext) -> Classification {
        if context.hostname == self.hostname && context.port == Some(self.port) {
            Classification::Local
        } else {
            Classification::Deployed
        }
    }
}

impl Default for EnvironmentProbe {
    fn default() -> Self {
        Self::new(DEFAULT_DEV_HOSTNAME, DEFAULT_DEV_PORT)
    }
}
