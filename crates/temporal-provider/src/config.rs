// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provider configuration.
//!
//! Every attribute is optional in the configuration block and falls back to
//! an environment variable, then to a default:
//!
//! | Attribute       | Environment variable       | Default                 |
//! |-----------------|----------------------------|-------------------------|
//! | `host`          | `TEMPORAL_HOST`            | `127.0.0.1`             |
//! | `port`          | `TEMPORAL_PORT`            | `7233`                  |
//! | `token_url`     | `TEMPORAL_TOKEN_URL`       |                         |
//! | `client_id`     | `TEMPORAL_CLIENT_ID`       |                         |
//! | `client_secret` | `TEMPORAL_CLIENT_SECRET`   |                         |
//! | `audience`      | `TEMPORAL_AUDIENCE`        | `openid,profile,email`  |
//! | `insecure`      | `TEMPORAL_INSECURE`        | `false`                 |
//!
//! The `tls` block has no environment fallback.

use std::path::Path;

use serde::{Deserialize, Serialize};
use temporal_protocol::{ClientCredentials, TlsMaterial, TransportConfig};
use tracing::debug;

use crate::error::{ProviderError, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7233;
pub const DEFAULT_AUDIENCE: &str = "openid,profile,email";

const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Client TLS block. PEM strings may be wrapped in quotes and may use a
/// literal `\n` for line breaks, as they often do when passed through
/// environment-driven tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub cert: Option<String>,
    pub key: Option<String>,
    pub ca: Option<String>,
    /// Seconds between certificate reloads by long-running clients.
    /// Accepted for compatibility; each run reads the certificates once.
    pub cert_reload_time: Option<u64>,
    pub server_name: Option<String>,
}

/// Provider configuration block, as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub token_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub audience: Option<String>,
    pub insecure: Option<bool>,
    pub tls: Option<TlsConfig>,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

/// Fully resolved configuration ready for connecting.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub host: String,
    pub port: u16,
    /// Present when a client id is configured.
    pub credentials: Option<ClientCredentials>,
    pub insecure: bool,
    pub tls: Option<TlsMaterial>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl ResolvedConfig {
    /// `host:port`.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Transport settings, with an optional bearer token from the token
    /// endpoint.
    pub fn transport_config(&self, bearer_token: Option<String>) -> TransportConfig {
        TransportConfig {
            endpoint: self.endpoint(),
            insecure: self.insecure,
            tls: if self.insecure { None } else { self.tls.clone() },
            bearer_token,
            connect_timeout_ms: self.connect_timeout_ms,
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration block from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for environment variables.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, var: &str| -> Option<String> {
            non_empty(explicit.clone()).or_else(|| non_empty(lookup(var)))
        };

        let host = pick(&self.host, "TEMPORAL_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match pick(&self.port, "TEMPORAL_PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|e| ProviderError::Config(format!("invalid port {:?}: {}", p, e)))?,
            None => DEFAULT_PORT,
        };

        let token_url = pick(&self.token_url, "TEMPORAL_TOKEN_URL");
        let client_id = pick(&self.client_id, "TEMPORAL_CLIENT_ID");
        let client_secret = pick(&self.client_secret, "TEMPORAL_CLIENT_SECRET");
        let explicit_audience = non_empty(self.audience.clone());
        let audience = pick(&self.audience, "TEMPORAL_AUDIENCE")
            .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());

        let oauth_set = [&token_url, &client_id, &client_secret]
            .iter()
            .filter(|v| v.is_some())
            .count();
        if oauth_set != 0 && oauth_set != 3 {
            return Err(ProviderError::Config(
                "token_url, client_id and client_secret must be set together".to_string(),
            ));
        }
        if explicit_audience.is_some() && oauth_set == 0 {
            return Err(ProviderError::Config(
                "audience requires token_url, client_id and client_secret".to_string(),
            ));
        }

        let credentials = match (token_url, client_id, client_secret) {
            (Some(url), Some(id), Some(secret)) => {
                Some(ClientCredentials::new(url, id, secret, &audience))
            }
            _ => None,
        };

        let insecure = match self.insecure {
            Some(value) => value,
            None => match non_empty(lookup("TEMPORAL_INSECURE")) {
                Some(raw) => parse_bool(&raw).ok_or_else(|| {
                    ProviderError::Config(format!("invalid TEMPORAL_INSECURE value {:?}", raw))
                })?,
                None => false,
            },
        };

        let tls = match &self.tls {
            Some(block) => {
                if let Some(seconds) = block.cert_reload_time {
                    debug!(
                        seconds,
                        "tls.cert_reload_time ignored, certificates are read once per run"
                    );
                }
                Some(tls_material(block)?)
            }
            None => None,
        };

        Ok(ResolvedConfig {
            host,
            port,
            credentials,
            insecure,
            tls,
            connect_timeout_ms: self
                .connect_timeout_ms
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout_ms: self
                .request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        })
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port.to_string());
        self
    }

    /// Enable the OAuth2 client-credentials flow.
    pub fn with_credentials(
        mut self,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.token_url = Some(token_url.into());
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn tls_material(block: &TlsConfig) -> Result<TlsMaterial> {
    let cert = non_empty(block.cert.as_deref().map(normalize_cert));
    let key = non_empty(block.key.as_deref().map(normalize_cert));
    let (cert, key) = match (cert, key) {
        (Some(cert), Some(key)) => (cert, key),
        _ => {
            return Err(ProviderError::Config(
                "tls requires both cert and key".to_string(),
            ));
        }
    };

    Ok(TlsMaterial {
        cert,
        key,
        ca: block.ca.as_deref().map(normalize_cert).unwrap_or_default(),
        server_name: non_empty(block.server_name.as_deref().map(|s| strip_quotes(s).to_string())),
    })
}

/// Boolean in the forms `true/false`, `1/0`, `t/f`, any case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// One pair of surrounding double quotes removed. Anything else is kept.
pub fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// PEM text with surrounding quotes removed and literal `\n` sequences
/// turned into newlines.
pub fn normalize_cert(value: &str) -> String {
    strip_quotes(value).replace("\\n", "\n")
}
