//! Shared types for the Comanda backend
//!
//! Common types used across crates: the unified error system, domain models
//! (roles, principals, company identifiers) and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{CompanyId, InvalidRole, Principal, Role};
