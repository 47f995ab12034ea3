//! Terminal user interface for the portal sign-in client.

pub mod input;
pub mod render;
pub mod styles;
