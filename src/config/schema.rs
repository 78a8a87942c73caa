use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub dev_server: DevServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
    #[serde(default = "default_dev_hostname")]
    pub hostname: String,
    #[serde(default = "default_dev_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// URL the page is observed at; defaults to `http://{hostname}:{port}`.
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default = "default_index_file")]
    pub index_file: String,
    #[serde(default = "default_spa_fallback")]
    pub spa_fallback: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    #[serde(default = "default_dev_origin")]
    pub dev_origin: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    #[serde(default = "default_proxy_enabled")]
    pub enabled: bool,
    #[serde(default = "default_proxy_rules")]
    pub rules: Vec<ProxyRuleConfig>,
    /// Largest request body forwarded; bigger bodies get 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRuleConfig {
    pub path_prefix: String,
    /// Defaults to `backend.devOrigin`.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
    #[serde(default)]
    pub forward_credentials: bool,
}

// Default value functions
fn default_dev_hostname() -> String {
    crate::environment::DEFAULT_DEV_HOSTNAME.to_string()
}

fn default_dev_port() -> u16 {
    crate::environment::DEFAULT_DEV_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_spa_fallback() -> bool {
    true
}

fn default_dev_origin() -> String {
    crate::origin::DEFAULT_DEV_ORIGIN.to_string()
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_proxy_enabled() -> bool {
    true
}

fn default_max_body_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_change_origin() -> bool {
    true
}

fn default_proxy_rules() -> Vec<ProxyRuleConfig> {
    vec![
        ProxyRuleConfig {
            path_prefix: "/api".to_string(),
            target: None,
            change_origin: true,
            forward_credentials: true,
        },
        ProxyRuleConfig {
            path_prefix: "/media".to_string(),
            target: None,
            change_origin: true,
            forward_credentials: false,
        },
    ]
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_dev_hostname(),
            port: default_dev_port(),
            bind_address: default_bind_address(),
            public_url: None,
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            spa_fallback: default_spa_fallback(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dev_origin: default_dev_origin(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: default_proxy_enabled(),
            rules: default_proxy_rules(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl DevServerConfig {
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}/", self.hostname, self.port))
    }

    pub fn index_path(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }
}
