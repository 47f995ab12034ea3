//! Application state management for the portal sign-in client.
//!
//! This module contains the core `App` struct that manages the credential
//! form, the notification surface, session establishment, and the
//! background login task coordination.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::{ApiError, AuthClient};
use crate::auth::{validate, Session, SessionData, ValidationResult};
use crate::config::Config;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the login outcome channel.
/// A single login attempt is in flight at a time; 8 leaves headroom for
/// rapid resubmissions.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for identifier input.
/// The format rule caps valid IDs at 21 chars; extra room lets the user
/// see (and fix) over-long input instead of having keystrokes dropped.
const MAX_IDENTIFIER_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Environment variable prefilling the identifier field.
const IDENTIFIER_ENV: &str = "PORTAL_IDENTIFIER";

// User-facing messages for the notification surface.
pub const MSG_WELCOME: &str = "Login successful. Welcome!";
pub const MSG_CREDENTIAL_MISMATCH: &str = "ID and password do not match.";
pub const MSG_REQUEST_FAILED: &str = "There was a problem with the login request.";
pub const MSG_MALFORMED_RESPONSE: &str = "The server response was missing a session token.";

/// Check if a character can be added to the identifier input
pub fn can_add_identifier_char(current_len: usize, c: char) -> bool {
    current_len < MAX_IDENTIFIER_LENGTH && !c.is_control()
}

/// Check if a character can be added to the password input
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && !c.is_control()
}

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Form,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Identifier,
    Password,
    Remember,
    Button,
}

impl FormFocus {
    /// Get the next field (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            FormFocus::Identifier => FormFocus::Password,
            FormFocus::Password => FormFocus::Remember,
            FormFocus::Remember => FormFocus::Button,
            FormFocus::Button => FormFocus::Identifier,
        }
    }

    /// Get the previous field (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            FormFocus::Identifier => FormFocus::Button,
            FormFocus::Password => FormFocus::Identifier,
            FormFocus::Remember => FormFocus::Password,
            FormFocus::Button => FormFocus::Remember,
        }
    }
}

/// Single-slot notification modal. Opening while visible overwrites the
/// message; there is no queueing.
#[derive(Debug, Default)]
pub struct Notice {
    open: bool,
    message: String,
}

impl Notice {
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Outcome of a background login attempt, sent back to the UI loop
/// through an MPSC channel.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted; carries the session to establish.
    Success(SessionData),
    /// Credentials rejected or the request failed; carries the
    /// user-facing message.
    Failure(String),
}

/// Map an API error to the message shown in the notification surface.
fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized => MSG_CREDENTIAL_MISMATCH.to_string(),
        ApiError::Rejected(message) => message.clone(),
        ApiError::ServerError(_) | ApiError::Network(_) => MSG_REQUEST_FAILED.to_string(),
        ApiError::InvalidResponse(_) => MSG_MALFORMED_RESPONSE.to_string(),
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    client: AuthClient,

    // UI state
    pub state: AppState,
    pub focus: FormFocus,
    pub notice: Notice,
    pub status_message: Option<String>,

    // Credential form state
    pub identifier: String,
    pub password: String,
    pub remember: bool,
    pub validation: ValidationResult,

    // Session flags
    pub logged_in: bool,
    pub submitting: bool,

    // Background task channel
    login_rx: mpsc::Receiver<LoginOutcome>,
    login_tx: mpsc::Sender<LoginOutcome>,
}

impl App {
    /// Create an application instance from an explicit configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| PathBuf::from("./cache"));

        // Restore a remembered session if one is still live
        let mut session = Session::new(cache_dir);
        let restored = match session.load() {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Failed to load remembered session");
                false
            }
        };

        let client = AuthClient::new(config.server_url.clone())?;

        let identifier = std::env::var(IDENTIFIER_ENV)
            .ok()
            .or_else(|| config.last_identifier.clone())
            .unwrap_or_default();
        let validation = validate(&identifier);

        let status_message = session
            .data
            .as_ref()
            .map(|d| format!("Remembered session restored for {}", d.identifier));

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            session,
            client,

            state: AppState::Form,
            focus: if identifier.is_empty() {
                FormFocus::Identifier
            } else {
                FormFocus::Password
            },
            notice: Notice::default(),
            status_message,

            identifier,
            password: String::new(),
            remember: false,
            validation,

            logged_in: restored,
            submitting: false,

            login_rx: rx,
            login_tx: tx,
        })
    }

    // =========================================================================
    // Credential form state
    // =========================================================================

    pub fn push_identifier_char(&mut self, c: char) {
        if can_add_identifier_char(self.identifier.len(), c) {
            self.identifier.push(c);
            self.validation = validate(&self.identifier);
        }
    }

    pub fn pop_identifier_char(&mut self) {
        self.identifier.pop();
        self.validation = validate(&self.identifier);
    }

    pub fn push_password_char(&mut self, c: char) {
        if can_add_password_char(self.password.len(), c) {
            self.password.push(c);
        }
    }

    pub fn pop_password_char(&mut self) {
        self.password.pop();
    }

    pub fn toggle_remember(&mut self) {
        self.remember = !self.remember;
    }

    /// Submission is enabled only with a valid identifier and a non-empty
    /// password.
    pub fn can_submit(&self) -> bool {
        self.validation.is_valid && !self.password.is_empty()
    }

    /// The validation message is shown only while the identifier is
    /// non-empty.
    pub fn show_validation(&self) -> bool {
        !self.identifier.is_empty()
    }

    // =========================================================================
    // Login submission
    // =========================================================================

    /// Spawn a background task submitting the current credentials.
    /// No-op unless `can_submit()`. Rapid repeated triggers each spawn
    /// their own attempt; outcomes are processed in arrival order.
    pub fn submit(&mut self) {
        if !self.can_submit() {
            return;
        }

        let client = self.client.clone();
        let identifier = self.identifier.clone();
        let password = self.password.clone();
        let persistent = self.remember;
        let tx = self.login_tx.clone();

        self.submitting = true;
        self.status_message = Some("Signing in...".to_string());
        info!("Submitting login request");

        tokio::spawn(async move {
            let outcome = match client.login(&identifier, &password).await {
                Ok(token) => LoginOutcome::Success(SessionData {
                    token,
                    identifier,
                    persistent,
                    created_at: Utc::now(),
                }),
                Err(e) => {
                    error!(error = %e, "Login failed");
                    LoginOutcome::Failure(user_message(&e))
                }
            };
            if let Err(e) = tx.send(outcome).await {
                error!(error = %e, "Failed to send login outcome - channel closed");
            }
        });
    }

    /// Drain completed login attempts from the background channel.
    pub fn check_login_results(&mut self) {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.login_rx.try_recv() {
            outcomes.push(outcome);
        }
        for outcome in outcomes {
            self.process_login_outcome(outcome);
        }
    }

    /// Apply a single login outcome to the application state.
    ///
    /// A session is only ever established here, from a success outcome
    /// that carries a token; `logged_in` is never set without one.
    pub fn process_login_outcome(&mut self, outcome: LoginOutcome) {
        self.submitting = false;
        self.status_message = None;
        match outcome {
            LoginOutcome::Success(data) => {
                self.config.last_identifier = Some(data.identifier.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                if let Err(e) = self.session.establish(data) {
                    warn!(error = %e, "Failed to persist remembered session");
                }

                self.logged_in = true;
                self.password.clear();
                info!("Login successful");
                self.notice.open(MSG_WELCOME);
            }
            LoginOutcome::Failure(message) => {
                self.notice.open(message);
            }
        }
    }

    // =========================================================================
    // External hand-offs
    // =========================================================================

    /// Surface the social-login URL. The hand-off itself happens in a
    /// browser, outside this client.
    pub fn show_social_login(&mut self) {
        self.status_message = Some(match self.config.social_login_url {
            Some(ref url) => format!("Social login: {}", url),
            None => "No social login URL configured".to_string(),
        });
    }

    /// Surface the registration URL.
    pub fn show_register(&mut self) {
        self.status_message = Some(match self.config.register_url {
            Some(ref url) => format!("Register: {}", url),
            None => "No registration URL configured".to_string(),
        });
    }
}
