//! Online session connector
//!
//! Signs the user in with the password grant, locates the organization through
//! the global discovery service and confirms the session with a WhoAmI call.

use super::discovery::{instance_filter, DiscoveredInstance, DiscoveryResponse, WhoAmIResponse};
use super::{ConnectedOrganization, ConnectionResult, SessionConnector};
use crate::auth::{resource_from_endpoint, AuthError, PasswordAuth};
use crate::config::Settings;
use crate::credentials::{Credentials, Region};
use reqwest::Client;
use std::error::Error as _;
use thiserror::Error;
use tokio::runtime::Runtime;

/// Connection errors
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Organization '{organization}' was not found (region: {region})")]
    OrganizationNotFound { organization: String, region: Region },

    #[error("Service error ({0}): {1}")]
    ServiceError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl ConnectError {
    /// True for failures the remote service reported itself, as opposed to
    /// transport, parsing or local runtime problems
    pub fn is_service_reported(&self) -> bool {
        matches!(
            self,
            ConnectError::Auth(AuthError::TokenRequestFailed(_))
                | ConnectError::OrganizationNotFound { .. }
                | ConnectError::ServiceError(..)
        )
    }

    /// Message plus every underlying cause
    fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !detail.contains(&text) {
                detail.push_str(": ");
                detail.push_str(&text);
            }
            source = cause.source();
        }
        detail
    }
}

impl From<ConnectError> for ConnectionResult {
    fn from(err: ConnectError) -> Self {
        if err.is_service_reported() {
            ConnectionResult::error(err.to_string())
        } else {
            ConnectionResult::exception(err.detail())
        }
    }
}

/// Async half of the connector: HTTP calls for one sign-in
#[derive(Debug)]
pub struct SessionClient {
    settings: Settings,
    auth: PasswordAuth,
    http_client: Client,
}

impl SessionClient {
    pub fn new(settings: Settings) -> Result<Self, ConnectError> {
        let mut builder = Client::builder().timeout(settings.http_timeout);
        if !settings.use_proxy {
            builder = builder.no_proxy();
        }
        let http_client = builder.build()?;
        let auth = PasswordAuth::new(
            settings.token_endpoint(),
            settings.client_id.clone(),
            http_client.clone(),
        );

        Ok(Self {
            settings,
            auth,
            http_client,
        })
    }

    /// Run the full sign-in for `credentials`
    pub async fn establish(
        &self,
        credentials: &Credentials,
    ) -> Result<ConnectedOrganization, ConnectError> {
        let discovery_resource = resource_from_endpoint(&self.settings.discovery_url);
        let discovery_token = self
            .auth
            .acquire_token(&discovery_resource, &credentials.user_id, &credentials.password)
            .await?;

        let instance = self.discover(&discovery_token, credentials).await?;
        tracing::info!(
            "Found organization {} at {}",
            instance.display_name(),
            instance.api_url
        );

        let api_resource = resource_from_endpoint(&instance.api_url);
        let api_token = self
            .auth
            .acquire_token(&api_resource, &credentials.user_id, &credentials.password)
            .await?;

        let who = self.who_am_i(&api_token, &instance.api_url).await?;

        Ok(ConnectedOrganization {
            friendly_name: instance.display_name().to_string(),
            url: instance.url,
            api_url: instance.api_url,
            user_id: who.user_id,
        })
    }

    /// Find the organization, trying the preferred region first when asked
    async fn discover(
        &self,
        token: &str,
        credentials: &Credentials,
    ) -> Result<DiscoveredInstance, ConnectError> {
        if credentials.region == Region::PreferredRegion {
            let filter = instance_filter(
                &credentials.organization,
                Some(self.settings.preferred_region_code.as_str()),
            );
            if let Some(instance) = self.query_instances(token, &filter).await? {
                return Ok(instance);
            }
            tracing::debug!(
                "Organization {} not in region {}, searching all geographies",
                credentials.organization,
                self.settings.preferred_region_code
            );
        }

        let filter = instance_filter(&credentials.organization, None);
        self.query_instances(token, &filter)
            .await?
            .ok_or_else(|| ConnectError::OrganizationNotFound {
                organization: credentials.organization.clone(),
                region: credentials.region,
            })
    }

    async fn query_instances(
        &self,
        token: &str,
        filter: &str,
    ) -> Result<Option<DiscoveredInstance>, ConnectError> {
        let url = self.settings.discovery_instances_url();
        tracing::debug!("Discovery query: {} ($filter={})", url, filter);

        let response = self
            .http_client
            .get(&url)
            .query(&[("$filter", filter)])
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::ServiceError(status.as_u16(), body));
        }

        let discovery: DiscoveryResponse = response.json().await.map_err(|e| {
            ConnectError::ParseError(format!("Failed to parse discovery response: {}", e))
        })?;

        Ok(discovery.value.into_iter().next())
    }

    async fn who_am_i(&self, token: &str, api_url: &str) -> Result<WhoAmIResponse, ConnectError> {
        let url = format!(
            "{}/api/data/{}/WhoAmI",
            api_url.trim_end_matches('/'),
            self.settings.api_version
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::ServiceError(status.as_u16(), body));
        }

        response.json().await.map_err(|e| {
            ConnectError::ParseError(format!("Failed to parse WhoAmI response: {}", e))
        })
    }
}

/// Blocking [`SessionConnector`] for Dynamics 365 online
pub struct OnlineConnector {
    runtime: Runtime,
    client: SessionClient,
}

impl OnlineConnector {
    pub fn new(settings: Settings) -> Result<Self, ConnectError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = SessionClient::new(settings)?;
        Ok(Self { runtime, client })
    }
}

impl SessionConnector for OnlineConnector {
    fn connect(&mut self, credentials: &Credentials) -> ConnectionResult {
        tracing::info!(
            "Connecting to {} as {} (region: {})",
            credentials.organization,
            credentials.user_id,
            credentials.region
        );

        match self.runtime.block_on(self.client.establish(credentials)) {
            Ok(organization) => ConnectionResult::ready(Some(organization)),
            Err(e) => {
                tracing::debug!("Connection attempt failed: {}", e);
                e.into()
            }
        }
    }
}
