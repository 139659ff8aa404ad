//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Shared-secret authentication.
    pub access: AccessConfig,

    /// Browser origin policy.
    pub cors: CorsConfig,

    /// Plaintext-to-HTTPS enforcement.
    pub transport: TransportConfig,

    /// Media metadata provider.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Shared-secret configuration.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AccessConfig {
    /// Secret callers present in `x-access-key` or `?ACCESS_KEY=`. Required.
    pub access_key: String,

    /// Re-check the Origin header against `cors.allowed_origins` during authentication.
    pub verify_origin: bool,
}

impl std::fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessConfig")
            .field("access_key", &redact(&self.access_key))
            .field("verify_origin", &self.verify_origin)
            .finish()
    }
}

/// How browser origins are treated.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OriginMode {
    /// Only origins listed in `allowed_origins` may call the gateway.
    #[default]
    Strict,
    /// Any origin is accepted; credentials are never allowed.
    AllowAll,
}

impl std::str::FromStr for OriginMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(OriginMode::Strict),
            "allow-all" | "allow_all" | "any" => Ok(OriginMode::AllowAll),
            other => Err(format!("unknown origin policy '{}'", other)),
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin policy. `None` means the operator never chose one; `Strict` applies.
    pub mode: Option<OriginMode>,

    /// Exact `scheme://host[:port]` origins allowed in strict mode.
    pub allowed_origins: Vec<String>,

    /// Emit `Access-Control-Allow-Credentials: true` for allowed origins.
    /// Defaults to on in strict mode and off in allow-all mode.
    pub allow_credentials: Option<bool>,
}

impl CorsConfig {
    /// The policy in force, falling back to strict.
    pub fn effective_mode(&self) -> OriginMode {
        self.mode.unwrap_or_default()
    }

    pub fn credentials_allowed(&self) -> bool {
        self.allow_credentials
            .unwrap_or(self.effective_mode() == OriginMode::Strict)
    }
}

/// Transport security configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TransportConfig {
    /// Running in production (`NODE_ENV=production`).
    pub production: bool,

    /// Redirect non-HTTPS traffic. Defaults to `production` when unset.
    pub enforce_https: Option<bool>,
}

impl TransportConfig {
    pub fn https_required(&self) -> bool {
        self.enforce_https.unwrap_or(self.production)
    }
}

/// Upstream media provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the provider API (e.g., "https://api.themoviedb.org/3").
    pub base_url: String,

    /// Provider API key, sent as the `api_key` query parameter.
    pub api_key: String,

    /// Response language (e.g., "en-US").
    pub language: String,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: String::new(),
            language: "en-US".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines. Defaults to `transport.production` when unset.
    pub json_logs: Option<bool>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "[REDACTED]"
    }
}
