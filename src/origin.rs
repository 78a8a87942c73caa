//! Backend origin value and the resolver that picks it at startup.
//!
//! An [`Origin`] is always `<scheme>://<host>[:<port>]` with no path, query
//! or fragment. Default ports are omitted, matching how browsers serialize
//! `window.location.origin`.

use crate::environment::{Classification, EnvironmentContext};
use crate::error::ConfigError;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// Well-known address of the local backend during development.
pub const DEFAULT_DEV_ORIGIN: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(String);

impl Origin {
    /// Parse an absolute `http`/`https` URL origin.
    ///
    /// A single trailing `/` is tolerated; any other path, a query or a
    /// fragment is rejected.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|e| ConfigError::invalid_origin(input, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::invalid_origin(
                    input,
                    format!("unsupported scheme '{other}'"),
                ))
            }
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::invalid_origin(input, "missing host"));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::invalid_origin(
                input,
                "origin must not carry a path, query or fragment",
            ));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::invalid_origin(input, "origin must not carry credentials"));
        }

        Ok(Self(url.origin().ascii_serialization()))
    }

    /// Build the same-origin value for an observed page context.
    pub fn from_context(context: &EnvironmentContext) -> Self {
        Self(format!("{}://{}", context.scheme(), context.host()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.split_once("://").map_or("", |(scheme, _)| scheme)
    }

    /// `host[:port]`, the value a `Host` header carries for this origin.
    pub fn authority(&self) -> &str {
        self.0.split_once("://").map_or("", |(_, authority)| authority)
    }

    /// Absolute URL for a path (and optional query) under this origin.
    pub fn join(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{}", self.0, path_and_query)
        } else {
            format!("{}/{}", self.0, path_and_query)
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Maps a classified environment to the origin every API and media request
/// is sent to.
#[derive(Debug, Clone)]
pub struct OriginResolver {
    dev_origin: Origin,
}

impl OriginResolver {
    pub fn new(dev_origin: Origin) -> Self {
        Self { dev_origin }
    }

    pub fn dev_origin(&self) -> &Origin {
        &self.dev_origin
    }

    /// `Local` always yields the development backend regardless of what the
    /// context observed. `Deployed` yields the page's own scheme and host.
    pub fn resolve(&self, context: &EnvironmentContext, classification: Classification) -> Origin {
        match classification {
            Classification::Local => self.dev_origin.clone(),
            Classification::Deployed => Origin::from_context(context),
        }
    }
}

impl Default for OriginResolver {
    fn default() -> Self {
        Self {
            dev_origin: Origin(DEFAULT_DEV_ORIGIN.to_string()),
        }
    }
}
