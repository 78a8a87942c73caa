use super::schema::Config;
use crate::environment::EnvironmentContext;
use crate::error::{ConfigError, Result};
use crate::origin::Origin;
use crate::proxy::ProxyTable;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const ENV_PREFIX: &str = "SPA_DEVGATE_";

pub async fn load_from_env_or_file() -> Result<Config> {
    let config: Config = Figment::new()
        // Try to load from various config files
        .merge(Toml::file("spa-devgate.toml"))
        .merge(Json::file("spa-devgate.json"))
        .merge(Yaml::file("spa-devgate.yaml"))
        .merge(Yaml::file("spa-devgate.yml"))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    finalize(config)
}

pub async fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    let figment = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Figment::new().merge(Toml::file(path)),
        Some("json") => Figment::new().merge(Json::file(path)),
        Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
        _ => {
            return Err(ConfigError::Parse(
                "Unsupported config file format. Use .toml, .json, .yaml, or .yml".into(),
            )
            .into())
        }
    };

    if !path.exists() {
        return Err(ConfigError::Parse(format!(
            "Configuration file not found: {}",
            path.display()
        ))
        .into());
    }

    let config: Config = figment
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    finalize(config)
}

fn finalize(config: Config) -> Result<Config> {
    let config = apply_env_substitutions(config)?;
    validate(&config)?;
    Ok(config)
}

/// `SPA_DEVGATE_DEV_SERVER__PUBLIC_URL` maps to `devServer.publicUrl`:
/// `__` separates nesting levels, single `_` separates words.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .lowercase(false)
        .map(|key| env_key_path(key.as_str()).into())
}

fn env_key_path(key: &str) -> String {
    key.to_ascii_lowercase()
        .split("__")
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for ch in segment.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn validate(config: &Config) -> Result<()> {
    if config.dev_server.port == 0 {
        return Err(ConfigError::Validation("Dev server port must be greater than 0".into()).into());
    }

    if config.dev_server.hostname.trim().is_empty() {
        return Err(ConfigError::Validation("Dev server hostname must not be empty".into()).into());
    }

    if config.dev_server.index_file.trim().is_empty() {
        return Err(ConfigError::Validation("Dev server index file must not be empty".into()).into());
    }

    EnvironmentContext::from_url(&config.dev_server.public_url())?;

    Origin::parse(&config.backend.dev_origin)?;

    if config.proxy.max_body_bytes == 0 {
        return Err(ConfigError::Validation("Proxy body limit must be greater than 0".into()).into());
    }

    if config.backend.request_timeout_ms == 0 {
        return Err(ConfigError::Validation("Request timeout must be greater than 0".into()).into());
    }

    // Prefix shape, duplicates and rule targets
    ProxyTable::from_config(config)?;

    Ok(())
}

fn apply_env_substitutions(mut config: Config) -> Result<Config> {
    config.backend.dev_origin = substitute_env_vars(&config.backend.dev_origin)?;

    if let Some(public_url) = &mut config.dev_server.public_url {
        *public_url = substitute_env_vars(public_url)?;
    }

    for rule in &mut config.proxy.rules {
        if let Some(target) = &mut rule.target {
            *target = substitute_env_vars(target)?;
        }
    }

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();

    for cap in env_var_pattern().captures_iter(input) {
        let var_name = &cap[1];
        // ${VAR:-default}
        let (name, default) = match var_name.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (var_name, None),
        };

        let value = match (std::env::var(name), default) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                return Err(ConfigError::EnvVar(format!(
                    "Environment variable '{}' not found",
                    name
                ))
                .into())
            }
        };
        result = result.replace(&cap[0], &value);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyRuleConfig;
    use crate::error::GatewayError;
    use std::io::Write;

    #[test]
    fn test_env_substitution() {
        std::env::set_var("SPA_DEVGATE_TEST_BACKEND", "http://backend:9000");

        let result = substitute_env_vars("${SPA_DEVGATE_TEST_BACKEND}").unwrap();
        assert_eq!(result, "http://backend:9000");

        let result = substitute_env_vars("http://${SPA_DEVGATE_TEST_MISSING:-localhost}:8000").unwrap();
        assert_eq!(result, "http://localhost:8000");

        assert!(substitute_env_vars("${SPA_DEVGATE_TEST_MISSING}").is_err());

        std::env::remove_var("SPA_DEVGATE_TEST_BACKEND");
    }

    #[test]
    fn test_env_key_path() {
        assert_eq!(env_key_path("DEV_SERVER__PUBLIC_URL"), "devServer.publicUrl");
        assert_eq!(env_key_path("BACKEND__DEV_ORIGIN"), "backend.devOrigin");
        assert_eq!(env_key_path("PROXY__ENABLED"), "proxy.enabled");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_prefixes() {
        let mut config = Config::default();
        config.proxy.rules.push(ProxyRuleConfig {
            path_prefix: "/api".to_string(),
            target: Some("http://localhost:9000".to_string()),
            change_origin: false,
            forward_credentials: false,
        });

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, GatewayError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_bad_origins() {
        let mut config = Config::default();
        config.backend.dev_origin = "localhost:8000".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            GatewayError::Config(ConfigError::InvalidOrigin { .. })
        ));

        let mut config = Config::default();
        config.proxy.rules[1].target = Some("http://localhost:8000/media".to_string());
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.dev_server.public_url = Some("file:///index.html".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_relative_prefix() {
        let mut config = Config::default();
        config.proxy.rules[0].path_prefix = "api".to_string();
        assert!(validate(&config).is_err());
    }

    #[tokio::test]
    async fn test_load_from_toml_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[devServer]
port = 4173
publicUrl = "https://contest.example.org/"

[backend]
devOrigin = "http://127.0.0.1:8001"

[[proxy.rules]]
pathPrefix = "/api"
forwardCredentials = true
"#
        )
        .unwrap();

        let config = load_from_path(file.path()).await.unwrap();
        assert_eq!(config.dev_server.port, 4173);
        assert_eq!(config.dev_server.public_url(), "https://contest.example.org/");
        assert_eq!(config.backend.dev_origin, "http://127.0.0.1:8001");
        assert_eq!(config.proxy.rules.len(), 1);
        assert!(config.proxy.rules[0].change_origin);
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        assert!(load_from_path(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(dir.path().join("absent.yaml")).await.is_err());
    }
}
