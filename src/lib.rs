//! D365 Connect Library
//!
//! Interactive console sign-in for Microsoft Dynamics 365 online organizations.
//! Collects credentials with a masked password prompt and retries the
//! connection until it succeeds or the user gives up.

pub mod auth;
pub mod config;
pub mod connect;
pub mod console;
pub mod credentials;
pub mod debug_log;
pub mod prompt;
pub mod session;

pub use config::Settings;
pub use connect::{ConnectionResult, OnlineConnector, SessionConnector};
pub use console::{Console, CrlfWriter, Key, TerminalConsole};
pub use credentials::{Credentials, Region, SecurePassword};
pub use debug_log::DebugLog;
pub use session::{ConnectionLoop, LoopOutcome, LoopState};
