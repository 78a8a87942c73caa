use crate::config::Config;
use crate::error::ConfigError;
use crate::origin::Origin;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRule {
    path_prefix: String,
    target: Origin,
    change_origin: bool,
    forward_credentials: bool,
}

impl ProxyRule {
    pub fn new(
        path_prefix: impl Into<String>,
        target: Origin,
        change_origin: bool,
        forward_credentials: bool,
    ) -> Result<Self, ConfigError> {
        let path_prefix = path_prefix.into();
        if !path_prefix.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "Proxy path prefix '{}' must start with '/'",
                path_prefix
            )));
        }

        Ok(Self {
            path_prefix,
            target,
            change_origin,
            forward_credentials,
        })
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn target(&self) -> &Origin {
        &self.target
    }

    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    pub fn forward_credentials(&self) -> bool {
        self.forward_credentials
    }

    /// Plain string prefix test, so `/api` also claims `/api-docs`.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }
}

/// Where a matched request goes and how its headers are treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    pub path_prefix: String,
    pub url: String,
    pub target: Origin,
    pub change_origin: bool,
    pub forward_credentials: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Forward(ForwardTarget),
    PassThrough,
}

/// Ordered set of forwarding rules with distinct prefixes. The first rule
/// whose prefix matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyTable {
    rules: Vec<ProxyRule>,
}

impl ProxyTable {
    pub fn new(rules: Vec<ProxyRule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.path_prefix.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "Duplicate proxy path prefix '{}'",
                    rule.path_prefix
                )));
            }
        }
        Ok(Self { rules })
    }

    /// A table that forwards nothing.
    pub fn inert() -> Self {
        Self { rules: Vec::new() }
    }

    /// `/api` with credentials and `/media` without, both to `backend`.
    pub fn defaults(backend: &Origin) -> Self {
        Self {
            rules: vec![
                ProxyRule {
                    path_prefix: "/api".to_string(),
                    target: backend.clone(),
                    change_origin: true,
                    forward_credentials: true,
                },
                ProxyRule {
                    path_prefix: "/media".to_string(),
                    target: backend.clone(),
                    change_origin: true,
                    forward_credentials: false,
                },
            ],
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let backend = Origin::parse(&config.backend.dev_origin)?;

        let rules = config
            .proxy
            .rules
            .iter()
            .map(|rule| {
                let target = match &rule.target {
                    Some(target) => Origin::parse(target)?,
                    None => backend.clone(),
                };
                ProxyRule::new(
                    rule.path_prefix.clone(),
                    target,
                    rule.change_origin,
                    rule.forward_credentials,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rules)
    }

    pub fn rules(&self) -> &[ProxyRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn match_path(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    /// Decide what happens to a request for `path` (and its raw query).
    pub fn route(&self, path: &str, query: Option<&str>) -> Route {
        let Some(rule) = self.match_path(path) else {
            return Route::PassThrough;
        };

        let path_and_query = match query {
            Some(query) if !query.is_empty() => format!("{path}?{query}"),
            _ => path.to_string(),
        };

        Route::Forward(ForwardTarget {
            path_prefix: rule.path_prefix.clone(),
            url: rule.target.join(&path_and_query),
            target: rule.target.clone(),
            change_origin: rule.change_origin,
            forward_credentials: rule.forward_credentials,
        })
    }
}
