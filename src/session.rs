//! Connection attempt loop
//!
//! Prompts for credentials, hands them to a [`SessionConnector`] and repeats
//! until the connector reports a ready session or the user presses Escape.
//! Retries are unbounded and entirely user-paced.

use crate::config::Settings;
use crate::connect::{ConnectedOrganization, ConnectionResult, SessionConnector};
use crate::console::{Console, Key};
use crate::credentials::Region;
use crate::debug_log::DebugLog;
use crate::prompt::prompt_credentials;
use std::io;

/// States of the connection loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Prompting,
    Connecting,
    Ready,
    Failed,
    Aborted,
}

/// Who connected, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedSession {
    pub user_id: String,
    pub organization: String,
    pub region: Region,
    pub details: Option<ConnectedOrganization>,
}

/// How the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    /// `Ready` or `Aborted`
    pub state: LoopState,
    pub attempts: u32,
    pub session: Option<ConnectedSession>,
}

/// Drives prompt → connect → retry against a console and a connector
pub struct ConnectionLoop<'a, C: Console, S: SessionConnector> {
    console: &'a mut C,
    connector: &'a mut S,
    settings: &'a Settings,
    log: &'a DebugLog,
}

impl<'a, C: Console, S: SessionConnector> ConnectionLoop<'a, C, S> {
    pub fn new(
        console: &'a mut C,
        connector: &'a mut S,
        settings: &'a Settings,
        log: &'a DebugLog,
    ) -> Self {
        Self {
            console,
            connector,
            settings,
            log,
        }
    }

    /// Run until `Ready` or `Aborted`. Only terminal I/O errors end it early.
    pub fn run(&mut self) -> io::Result<LoopOutcome> {
        let mut state = LoopState::Prompting;
        let mut attempts = 0u32;
        let mut credentials = None;
        let mut result = ConnectionResult::default();

        loop {
            tracing::debug!("Connection loop state: {:?}", state);

            state = match state {
                LoopState::Prompting => {
                    credentials = Some(prompt_credentials(self.console, self.settings)?);
                    LoopState::Connecting
                }
                LoopState::Connecting => match credentials.as_ref() {
                    // Connecting is only entered from Prompting
                    None => LoopState::Prompting,
                    Some(creds) => {
                        attempts += 1;
                        self.console.write_line("\nConnecting...")?;
                        self.log.log(&format!(
                            "Attempt {}: connecting to {} as {}",
                            attempts, creds.organization, creds.user_id
                        ));

                        result = self.connector.connect(creds);
                        if result.is_ready {
                            LoopState::Ready
                        } else {
                            LoopState::Failed
                        }
                    }
                },
                LoopState::Failed => {
                    // Drop the password before waiting on the user
                    credentials = None;
                    self.log.log(&format!(
                        "Attempt {} failed: {}",
                        attempts,
                        failure_summary(&result)
                    ));

                    report_failure(self.console, &result)?;
                    self.console
                        .write_line("\nPress Escape to exit. Any other key to try again...")?;

                    if self.console.read_key(true)? == Key::Escape {
                        LoopState::Aborted
                    } else {
                        self.console.write_line("")?;
                        self.console.clear()?;
                        LoopState::Prompting
                    }
                }
                LoopState::Ready => {
                    let session = credentials.take().map(|creds| ConnectedSession {
                        user_id: creds.user_id.clone(),
                        organization: creds.organization.clone(),
                        region: creds.region,
                        details: result.organization.take(),
                    });

                    self.log.log(&format!("Attempt {} succeeded", attempts));
                    report_success(self.console, session.as_ref())?;

                    return Ok(LoopOutcome {
                        state: LoopState::Ready,
                        attempts,
                        session,
                    });
                }
                LoopState::Aborted => {
                    tracing::info!("Connection aborted after {} attempt(s)", attempts);
                    return Ok(LoopOutcome {
                        state: LoopState::Aborted,
                        attempts,
                        session: None,
                    });
                }
            };
        }
    }
}

fn failure_summary(result: &ConnectionResult) -> String {
    match (&result.last_error, &result.last_exception) {
        (error, _) if !error.is_empty() => error.clone(),
        (_, Some(exception)) => exception.clone(),
        _ => "no detail".to_string(),
    }
}

/// Print the error and exception lines, each only when it has content
pub fn report_failure<C: Console>(console: &mut C, result: &ConnectionResult) -> io::Result<()> {
    if !result.last_error.is_empty() {
        console.write_line(&format!("Error: {}", result.last_error))?;
    }

    if let Some(exception) = result.last_exception.as_deref().filter(|e| !e.is_empty()) {
        console.write_line(&format!("Exception: {}", exception))?;
    }

    Ok(())
}

fn report_success<C: Console>(console: &mut C, session: Option<&ConnectedSession>) -> io::Result<()> {
    console.write_line("Success: Connected to Dynamics 365\n")?;

    if let Some(details) = session.and_then(|s| s.details.as_ref()) {
        console.write_line(&format!(
            "Organization: {} ({})",
            details.friendly_name, details.url
        ))?;
        console.write_line(&format!("User Id: {}", details.user_id))?;
    }

    Ok(())
}
