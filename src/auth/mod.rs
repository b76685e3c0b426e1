//! Azure AD Authentication module
//!
//! Implements the OAuth2 resource owner password flow used to sign a user in
//! to Microsoft Dynamics 365 online with a username and password.

use crate::credentials::SecurePassword;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    TokenRequestFailed(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Token parse error: {0}")]
    ParseError(String),
}

/// Token response from Azure AD
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    expires_in: u64,
}

/// Error body returned by the token endpoint
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenErrorResponse {
    /// Azure AD descriptions carry trace and correlation ids on extra lines
    fn summary(&self) -> String {
        match &self.error_description {
            Some(description) => description
                .lines()
                .next()
                .unwrap_or(description)
                .trim()
                .to_string(),
            None => self.error.clone(),
        }
    }
}

/// Azure AD helper for the password grant. Tokens are not cached; every
/// connection attempt signs in again.
#[derive(Debug)]
pub struct PasswordAuth {
    token_endpoint: String,
    client_id: String,
    http_client: Client,
}

impl PasswordAuth {
    /// Create a new password grant helper
    pub fn new(token_endpoint: String, client_id: String, http_client: Client) -> Self {
        Self {
            token_endpoint,
            client_id,
            http_client,
        }
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Acquire an access token for `resource` on behalf of `username`
    pub async fn acquire_token(
        &self,
        resource: &str,
        username: &str,
        password: &SecurePassword,
    ) -> Result<String, AuthError> {
        let scope = scope_for_resource(resource);
        tracing::info!("Acquiring access token for {} ({})", username, scope);

        let response = {
            let secret = password.expose();
            let params = [
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("scope", scope.as_str()),
                ("username", username),
                ("password", secret.as_str()),
            ];

            self.http_client
                .post(&self.token_endpoint)
                .form(&params)
                .send()
                .await?
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Token request failed with status {}", status);

            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => err.summary(),
                Err(_) => format!("Status: {}, Body: {}", status, body),
            };
            return Err(AuthError::TokenRequestFailed(message));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AuthError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        tracing::info!(
            "Token acquired successfully, expires in {} seconds",
            token_response.expires_in
        );

        Ok(token_response.access_token)
    }
}

/// Build the `.default` scope for a resource URL
pub fn scope_for_resource(resource: &str) -> String {
    if resource.ends_with('/') {
        format!("{}.default", resource)
    } else {
        format!("{}/.default", resource)
    }
}

/// Get resource URL (scheme + host + port) from an endpoint
pub fn resource_from_endpoint(endpoint: &str) -> String {
    if let Ok(url) = Url::parse(endpoint) {
        match url.port() {
            Some(port) => format!(
                "{}://{}:{}",
                url.scheme(),
                url.host_str().unwrap_or(""),
                port
            ),
            None => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("")),
        }
    } else {
        endpoint
            .split('/')
            .take(3)
            .collect::<Vec<_>>()
            .join("/")
    }
}
