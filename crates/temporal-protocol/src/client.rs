// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! gRPC channel helpers for connecting to a Temporal frontend.

use std::io::Cursor;
use std::time::Duration;

use thiserror::Error;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tonic::{Request, Status};
use tracing::{debug, info, instrument};

/// Errors that can occur while setting up the gRPC transport.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("invalid TLS material: {0}")]
    Tls(String),

    #[error("token request failed: {0}")]
    TokenRequest(#[from] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    TokenRejected { status: u16, body: String },

    #[error("access token is not a valid header value")]
    InvalidToken,
}

/// PEM-encoded TLS material for mutual TLS.
#[derive(Debug, Clone, Default)]
pub struct TlsMaterial {
    /// Client certificate chain.
    pub cert: String,
    /// Client private key (PKCS#1, PKCS#8 or SEC1).
    pub key: String,
    /// Trusted CA bundle. Empty means web-PKI roots only.
    pub ca: String,
    /// Overrides the TLS server name used for verification.
    pub server_name: Option<String>,
}

/// Configuration for the gRPC transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// `host:port` of the Temporal frontend.
    pub endpoint: String,
    /// Plaintext HTTP/2 with no TLS at all.
    pub insecure: bool,
    /// Client TLS material. Ignored when `insecure` is set.
    pub tls: Option<TlsMaterial>,
    /// Bearer token attached to every call.
    pub bearer_token: Option<String>,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Per-request timeout in milliseconds (0 to disable).
    pub request_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:7233".to_string(),
            insecure: false,
            tls: None,
            bearer_token: None,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl TransportConfig {
    /// URI handed to tonic: `http://` for insecure, `https://` otherwise.
    pub fn uri(&self) -> String {
        let scheme = if self.insecure { "http" } else { "https" };
        format!("{}://{}", scheme, self.endpoint)
    }
}

/// Interceptor adding `authorization: Bearer <token>` to outgoing calls.
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    header: Option<MetadataValue<Ascii>>,
}

impl BearerAuth {
    /// Interceptor that leaves requests untouched.
    pub fn none() -> Self {
        Self { header: None }
    }

    pub fn new(token: &str) -> Result<Self, ClientError> {
        let header = format!("Bearer {}", token)
            .parse::<MetadataValue<Ascii>>()
            .map_err(|_| ClientError::InvalidToken)?;
        Ok(Self {
            header: Some(header),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.header.is_some()
    }
}

impl Interceptor for BearerAuth {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(header) = &self.header {
            request
                .metadata_mut()
                .insert("authorization", header.clone());
        }
        Ok(request)
    }
}

/// Channel with the bearer interceptor applied, shared by all service clients.
pub type AuthChannel = InterceptedService<Channel, BearerAuth>;

/// Build a lazily-connecting channel for the given configuration.
///
/// No network traffic happens here; the first RPC establishes the
/// connection. Must be called from within a tokio runtime.
#[instrument(skip(config), fields(endpoint = %config.endpoint, insecure = config.insecure))]
pub fn connect(config: &TransportConfig) -> Result<AuthChannel, ClientError> {
    let uri = config.uri();
    let mut endpoint =
        Endpoint::from_shared(uri.clone()).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: uri.clone(),
            reason: e.to_string(),
        })?;

    endpoint = endpoint.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    if config.request_timeout_ms > 0 {
        endpoint = endpoint.timeout(Duration::from_millis(config.request_timeout_ms));
    }

    if !config.insecure {
        let tls = build_tls_config(config.tls.as_ref())?;
        endpoint = endpoint.tls_config(tls)?;
    }

    let auth = match &config.bearer_token {
        Some(token) => BearerAuth::new(token)?,
        None => BearerAuth::none(),
    };

    debug!(uri = %uri, authenticated = auth.is_enabled(), "creating lazy channel");
    let channel = endpoint.connect_lazy();
    info!("Temporal channel configured");

    Ok(InterceptedService::new(channel, auth))
}

fn build_tls_config(material: Option<&TlsMaterial>) -> Result<ClientTlsConfig, ClientError> {
    let mut tls = ClientTlsConfig::new().with_webpki_roots();

    let Some(material) = material else {
        return Ok(tls);
    };

    validate_certificates(&material.cert, "certificate")?;
    validate_private_key(&material.key)?;
    tls = tls.identity(Identity::from_pem(&material.cert, &material.key));

    if !material.ca.trim().is_empty() {
        validate_certificates(&material.ca, "CA certificate")?;
        tls = tls.ca_certificate(Certificate::from_pem(&material.ca));
    }

    if let Some(server_name) = material.server_name.as_deref().filter(|s| !s.is_empty()) {
        tls = tls.domain_name(server_name);
    }

    Ok(tls)
}

/// Check that `pem` holds at least one parseable certificate.
pub fn validate_certificates(pem: &str, what: &str) -> Result<(), ClientError> {
    let mut reader = Cursor::new(pem.as_bytes());
    let mut count = 0usize;
    for cert in rustls_pemfile::certs(&mut reader) {
        cert.map_err(|e| ClientError::Tls(format!("failed to parse {}: {}", what, e)))?;
        count += 1;
    }
    if count == 0 {
        return Err(ClientError::Tls(format!("no {} found in PEM", what)));
    }
    Ok(())
}

/// Check that `pem` holds a private key.
pub fn validate_private_key(pem: &str) -> Result<(), ClientError> {
    let mut reader = Cursor::new(pem.as_bytes());
    match rustls_pemfile::private_key(&mut reader) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ClientError::Tls("no private key found in PEM".to_string())),
        Err(e) => Err(ClientError::Tls(format!("failed to parse private key: {}", e))),
    }
}
