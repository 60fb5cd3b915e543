//! User roles
//!
//! A user starts without a role, may ask to be elevated, and an admin
//! grants `guide` or `admin`. The stored role is authoritative for every
//! authorization decision; tokens never carry it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// No elevated access. Older records store this as `guest` or `user`.
    #[default]
    #[serde(alias = "guest", alias = "user")]
    Unset,
    Guide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unset => "unset",
            Role::Guide => "guide",
            Role::Admin => "admin",
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Role::Unset)
    }

    /// Whether a user may ask an admin for this role
    pub fn is_requestable(&self) -> bool {
        matches!(self, Role::Guide | Role::Admin)
    }

    /// Validate a role a user is asking for
    pub fn requested(desired: &str) -> Result<Self> {
        let role: Role = desired.parse()?;
        if !role.is_requestable() {
            return Err(Error::RoleNotRequestable(role.to_string()));
        }
        Ok(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "unset" | "guest" | "user" => Ok(Role::Unset),
            "guide" => Ok(Role::Guide),
            "admin" => Ok(Role::Admin),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}
