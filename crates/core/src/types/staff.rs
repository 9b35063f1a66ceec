//! Vendor staff accounts.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::entity::{Entity, Validate, ValidationError, require};
use super::id::StaffId;

/// Permission level of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access to the vendor's store, including staff management.
    Manager,
    /// Manages products, orders and coupons.
    Editor,
    /// Read access plus order notes and reviews.
    #[default]
    Support,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Editor => write!(f, "editor"),
            Self::Support => write!(f, "support"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "editor" => Ok(Self::Editor),
            "support" => Ok(Self::Support),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}

/// A staff member with access to the vendor console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StaffId>,
    pub name: String,
    /// Kept as typed; checked with [`Email::parse`] on submit.
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: StaffRole,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl Default for StaffMember {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            phone: None,
            role: StaffRole::default(),
            active: true,
        }
    }
}

impl Entity for StaffMember {
    type Id = StaffId;

    fn id(&self) -> Option<&StaffId> {
        self.id.as_ref()
    }
}

impl Validate for StaffMember {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        Email::parse(&self.email).map_err(|e| ValidationError::invalid("email", e.to_string()))?;
        Ok(())
    }
}
