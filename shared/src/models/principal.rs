//! Authenticated principal

use super::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Company identifier (tenant key for data isolation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub i64);

impl CompanyId {
    #[inline]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CompanyId {
    fn from(id: i64) -> Self {
        CompanyId(id)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated principal attached to a request
///
/// Built by the authentication layer after credential/token verification.
/// The authorization core only reads it; it never constructs or mutates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Employee identifier
    pub id: String,
    /// Fixed role, decoded at the boundary
    pub role: Role,
    /// Company the employee belongs to
    pub company_id: CompanyId,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role, company_id: impl Into<CompanyId>) -> Self {
        Self {
            id: id.into(),
            role,
            company_id: company_id.into(),
        }
    }
}
