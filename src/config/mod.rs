//! Configuration module
//!
//! Fixed connection policy for Dynamics 365 online. There is no config file;
//! everything here is a compiled-in default that tests may override.

use std::time::Duration;

/// Writes debug lines to `Log.txt` when enabled.
pub const DEBUG_MODE: bool = false;

/// Public client registered by Microsoft for Dataverse samples and tooling.
pub const DEFAULT_CLIENT_ID: &str = "51f81489-12ee-4a9e-aaae-a2591f45987d";

/// Connection settings for the online connector and the console front end
#[derive(Debug, Clone)]
pub struct Settings {
    /// Azure AD authority host, without trailing slash
    pub authority_host: String,
    /// Tenant segment of the token endpoint
    pub tenant: String,
    pub client_id: String,
    /// Global discovery service root
    pub discovery_url: String,
    /// Dataverse Web API version used for WhoAmI
    pub api_version: String,
    /// Appended to `<username>@<organization>` when no domain is given
    pub tenant_domain_suffix: String,
    /// Discovery region code searched first for `Region::PreferredRegion`
    pub preferred_region_code: String,
    pub http_timeout: Duration,
    /// Honour system proxy settings for outbound HTTP
    pub use_proxy: bool,
    pub debug_log: bool,
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            authority_host: "https://login.microsoftonline.com".to_string(),
            tenant: "organizations".to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            discovery_url: "https://globaldisco.crm.dynamics.com".to_string(),
            api_version: "v9.2".to_string(),
            tenant_domain_suffix: ".onmicrosoft.com".to_string(),
            preferred_region_code: "NA".to_string(),
            http_timeout: Duration::from_secs(120),
            use_proxy: true,
            debug_log: DEBUG_MODE,
            log_file: "Log.txt".to_string(),
        }
    }
}

impl Settings {
    /// Token endpoint for the configured authority and tenant
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant
        )
    }

    /// Instances collection of the global discovery service
    pub fn discovery_instances_url(&self) -> String {
        format!(
            "{}/api/discovery/v2.0/Instances",
            self.discovery_url.trim_end_matches('/')
        )
    }
}
