//! Connect module
//!
//! The session-establishment seam: a trait the connection loop calls with
//! fresh credentials, the result it reads back, and the online implementation.

mod discovery;
mod online;

pub use discovery::{DiscoveredInstance, DiscoveryResponse};
pub use online::{ConnectError, OnlineConnector, SessionClient};

use crate::credentials::Credentials;

/// Organization details reported by a successful connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedOrganization {
    pub friendly_name: String,
    pub url: String,
    pub api_url: String,
    pub user_id: String,
}

/// Outcome of one connection attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionResult {
    pub is_ready: bool,
    /// Error reported by the service, empty when none
    pub last_error: String,
    /// Failure detail that did not come from the service
    pub last_exception: Option<String>,
    pub organization: Option<ConnectedOrganization>,
}

impl ConnectionResult {
    pub fn ready(organization: Option<ConnectedOrganization>) -> Self {
        Self {
            is_ready: true,
            organization,
            ..Default::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            last_error: message.into(),
            ..Default::default()
        }
    }

    pub fn exception(detail: impl Into<String>) -> Self {
        Self {
            last_exception: Some(detail.into()),
            ..Default::default()
        }
    }
}

/// Establishes an authenticated session for a set of credentials
pub trait SessionConnector {
    fn connect(&mut self, credentials: &Credentials) -> ConnectionResult;
}
