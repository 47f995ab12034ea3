//! Terminal sign-in client for the member portal.
//!
//! Submits credentials to the portal's login endpoint, establishes a
//! session from the returned token, and optionally remembers the session
//! across runs.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod ui;
