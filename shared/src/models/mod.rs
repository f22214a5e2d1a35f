//! Data models
//!
//! Shared between the API surface and the authorization core.
//! Roles are a closed set; principals arrive fully built from the
//! authentication layer.

pub mod principal;
pub mod role;

// Re-exports
pub use principal::*;
pub use role::*;
