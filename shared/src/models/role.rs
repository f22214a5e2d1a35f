//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fixed role set (RBAC 角色)
///
/// The backend ships exactly these six roles and offers no way to define new
/// ones at runtime. Unknown role names can only appear at the boundary where
/// tokens are decoded; inside the core the closed enum makes them
/// unrepresentable. Permission sets per role live in `comanda-guard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Gerente,
    Cajero,
    Mesero,
    Cocinero,
}

impl Role {
    /// All roles, in privilege order
    pub const ALL: &'static [Role] = &[
        Role::SuperAdmin,
        Role::Admin,
        Role::Gerente,
        Role::Cajero,
        Role::Mesero,
        Role::Cocinero,
    ];

    /// Wire name (matches the serde representation)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Gerente => "GERENTE",
            Role::Cajero => "CAJERO",
            Role::Mesero => "MESERO",
            Role::Cocinero => "COCINERO",
        }
    }

    /// Human-readable name shown in the UI
    pub const fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Administrador",
            Role::Admin => "Administrador",
            Role::Gerente => "Gerente",
            Role::Cajero => "Cajero",
            Role::Mesero => "Mesero",
            Role::Cocinero => "Cocinero",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown role name
///
/// Surfaced as-is: an unknown role in a decoded token is a configuration
/// defect, not a user-facing denial.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "GERENTE" => Ok(Role::Gerente),
            "CAJERO" => Ok(Role::Cajero),
            "MESERO" => Ok(Role::Mesero),
            "COCINERO" => Ok(Role::Cocinero),
            _ => Err(InvalidRole(s.to_string())),
        }
    }
}
