// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! OAuth2 client-credentials token acquisition.

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::client::ClientError;

/// Client-credentials grant parameters.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

impl ClientCredentials {
    /// Build credentials, splitting a comma-separated audience into scopes.
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        audience: &str,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: audience.split(',').map(str::to_string).collect(),
        }
    }
}

/// Token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Fetch an access token from the token endpoint.
///
/// Credentials go in the basic-auth header; scopes are space-joined per
/// RFC 6749.
#[instrument(skip(credentials), fields(token_url = %credentials.token_url))]
pub async fn fetch_token(credentials: &ClientCredentials) -> Result<AccessToken, ClientError> {
    let scope = credentials.scopes.join(" ");
    let mut form = vec![("grant_type", "client_credentials")];
    if !scope.is_empty() {
        form.push(("scope", scope.as_str()));
    }

    debug!(scopes = credentials.scopes.len(), "requesting access token");
    let response = reqwest::Client::new()
        .post(&credentials.token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::TokenRejected {
            status: status.as_u16(),
            body,
        });
    }

    let token: AccessToken = response.json().await?;
    info!(expires_in = ?token.expires_in, "access token acquired");
    Ok(token)
}
