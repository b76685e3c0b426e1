//! Credentials module
//!
//! Transient sign-in data gathered from the console for one connection attempt.

mod password;

pub use password::SecurePassword;

use std::fmt;

/// Geographic hint for organization discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Search the preferred (North America) region first
    PreferredRegion,
    /// Search all geographies
    AnySearch,
}

impl Region {
    /// Map the single-key menu answer to a region. Only `1` selects the
    /// preferred region; every other key, or none at all, searches everywhere.
    pub fn from_menu_key(key: Option<char>) -> Self {
        match key {
            Some('1') => Region::PreferredRegion,
            _ => Region::AnySearch,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::PreferredRegion => write!(f, "NorthAmerica"),
            Region::AnySearch => write!(f, "All"),
        }
    }
}

/// Sign-in data for a single attempt. Rebuilt on every retry.
#[derive(Debug)]
pub struct Credentials {
    pub organization: String,
    pub user_id: String,
    pub password: SecurePassword,
    pub region: Region,
}

impl Credentials {
    /// Build credentials, normalizing `username` into a UPN for `organization`
    pub fn new(
        organization: String,
        username: &str,
        password: SecurePassword,
        region: Region,
        domain_suffix: &str,
    ) -> Self {
        let user_id = normalize_user_id(username, &organization, domain_suffix);
        Self {
            organization,
            user_id,
            password,
            region,
        }
    }
}

/// Turn a bare username into `<username>@<organization><suffix>`.
/// Anything already containing `@` is returned unchanged.
pub fn normalize_user_id(username: &str, organization: &str, domain_suffix: &str) -> String {
    if username.contains('@') {
        username.to_string()
    } else {
        format!("{}@{}{}", username, organization, domain_suffix)
    }
}
