//! HTTP client module for the member portal's auth service.
//!
//! This module provides the `AuthClient` for submitting credentials to the
//! portal's login endpoint, and the `ApiError` taxonomy the UI maps to
//! user-facing messages.

pub mod client;
pub mod error;

pub use client::AuthClient;
pub use error::ApiError;
