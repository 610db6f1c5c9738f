use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Role carried by an authenticated session.
///
/// Unlike server-side RBAC, the client only needs the closed set of roles the
/// backend hands out at login.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Employee,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            _ => Err(CoreError::unknown_role(s)),
        }
    }
}
