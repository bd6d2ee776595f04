use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub upstreams: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest request body accepted by the resolve endpoint
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: ByteSize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_body_bytes() -> ByteSize {
    ByteSize(64 * 1024) // 64 KB
}

/// Outbound HTTP client settings shared by every strategy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Skips TLS certificate verification on outbound calls
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_accept_invalid_certs() -> bool {
    true
}

fn default_max_redirects() -> usize {
    10
}

/// Resolution pipeline settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Upper bound for a single strategy attempt
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

impl ResolverConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

fn default_attempt_timeout_secs() -> u64 {
    30
}

/// Upstream endpoints used by the extraction strategies
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Dedicated extraction API, queried with `?url=<link>`
    #[serde(default = "default_primary_api")]
    pub primary_api: String,
    /// Backup extraction API, receives `{"url": <link>}` as a JSON POST
    #[serde(default = "default_backup_api")]
    pub backup_api: String,
    /// CORS proxy returning `{"contents": ...}` for `?url=<link>`
    #[serde(default = "default_cors_proxy")]
    pub cors_proxy: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            primary_api: default_primary_api(),
            backup_api: default_backup_api(),
            cors_proxy: default_cors_proxy(),
        }
    }
}

fn default_primary_api() -> String {
    "https://ashlynn.serv00.net/Ashlynnterabox.php/".to_string()
}

fn default_backup_api() -> String {
    "https://terabox-dl.qtcloud.workers.dev/api/get-info".to_string()
}

fn default_cors_proxy() -> String {
    "https://api.allorigins.win/get".to_string()
}
