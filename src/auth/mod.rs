//! Authentication module for identifier validation and session storage.
//!
//! This module provides:
//! - `validate`: Pure identifier format check run on every keystroke
//! - `Session`: Token storage, in-memory always and on-disk with a 7-day
//!   expiry when the user opted into "remember me"

pub mod session;
pub mod validator;

pub use session::{Session, SessionData};
pub use validator::{validate, ValidationResult};
