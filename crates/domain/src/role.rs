//! Organization roles and bid roles.
//!
//! Both vocabularies share one shape, a role type held at a scope with an explicit
//! permission set, and differ only in which types carry blanket authority.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use bidgate_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{PermissionSet, Scope};

/// Behaviour shared by role vocabularies.
pub trait RoleKind: Copy + Eq + Debug + Send + Sync {
    /// Returns the label stored for this role type.
    fn label(&self) -> &'static str;

    /// Returns whether this type grants every permission within its scope.
    fn has_blanket_authority(&self) -> bool;

    /// Returns whether this type must never grant anything, whatever permissions it carries.
    fn is_inert(&self) -> bool;
}

/// Organization role types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleType {
    /// Administers a cooperative and everything beneath it.
    #[serde(rename = "Cooperative Admin")]
    CooperativeAdmin,
    /// Administers a district and its schools.
    #[serde(rename = "District Admin")]
    DistrictAdmin,
    /// Administers a single school.
    #[serde(rename = "School Admin")]
    SchoolAdmin,
    /// Read-only member.
    #[serde(rename = "Viewer")]
    Viewer,
}

impl RoleKind for RoleType {
    fn label(&self) -> &'static str {
        match self {
            Self::CooperativeAdmin => "Cooperative Admin",
            Self::DistrictAdmin => "District Admin",
            Self::SchoolAdmin => "School Admin",
            Self::Viewer => "Viewer",
        }
    }

    fn has_blanket_authority(&self) -> bool {
        match self {
            Self::CooperativeAdmin | Self::DistrictAdmin | Self::SchoolAdmin => true,
            Self::Viewer => false,
        }
    }

    fn is_inert(&self) -> bool {
        match self {
            Self::CooperativeAdmin | Self::DistrictAdmin | Self::SchoolAdmin | Self::Viewer => {
                false
            }
        }
    }
}

impl FromStr for RoleType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Cooperative Admin" => Ok(Self::CooperativeAdmin),
            "District Admin" => Ok(Self::DistrictAdmin),
            "School Admin" => Ok(Self::SchoolAdmin),
            "Viewer" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role type '{value}'"))),
        }
    }
}

impl Display for RoleType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Bid administration role types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidRoleType {
    /// Creates, edits and awards any bid within the scope.
    #[serde(rename = "Bid Administrator")]
    BidAdministrator,
    /// Manages bids within the scope as far as the permission set allows.
    #[serde(rename = "Bid Manager")]
    BidManager,
    /// Reads bids within the scope as far as the permission set allows.
    #[serde(rename = "Bid Viewer")]
    BidViewer,
    /// Explicitly holds no bid role. Display only.
    #[serde(rename = "None")]
    None,
}

impl RoleKind for BidRoleType {
    fn label(&self) -> &'static str {
        match self {
            Self::BidAdministrator => "Bid Administrator",
            Self::BidManager => "Bid Manager",
            Self::BidViewer => "Bid Viewer",
            Self::None => "None",
        }
    }

    fn has_blanket_authority(&self) -> bool {
        match self {
            Self::BidAdministrator => true,
            Self::BidManager | Self::BidViewer | Self::None => false,
        }
    }

    fn is_inert(&self) -> bool {
        match self {
            Self::None => true,
            Self::BidAdministrator | Self::BidManager | Self::BidViewer => false,
        }
    }
}

impl FromStr for BidRoleType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Bid Administrator" => Ok(Self::BidAdministrator),
            "Bid Manager" => Ok(Self::BidManager),
            "Bid Viewer" => Ok(Self::BidViewer),
            "None" => Ok(Self::None),
            _ => Err(AppError::Validation(format!(
                "unknown bid role type '{value}'"
            ))),
        }
    }
}

impl Display for BidRoleType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())
    }
}

/// A role type held at a scope with an explicit permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedRole<K> {
    #[serde(rename = "type")]
    role_type: K,
    scope: Scope,
    permissions: PermissionSet,
}

/// Organization-scoped role.
pub type Role = ScopedRole<RoleType>;

/// Bid-administration role.
pub type BidRole = ScopedRole<BidRoleType>;

impl<K: RoleKind> ScopedRole<K> {
    /// Creates a scoped role.
    #[must_use]
    pub fn new(role_type: K, scope: Scope, permissions: PermissionSet) -> Self {
        Self {
            role_type,
            scope,
            permissions,
        }
    }

    /// Returns the role type.
    #[must_use]
    pub fn role_type(&self) -> K {
        self.role_type
    }

    /// Returns the scope the role applies to.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Returns the permission set as stored, including for inert roles.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns whether this role grants `permission` somewhere within its scope.
    ///
    /// Inert roles never grant. Blanket-authority roles grant every permission.
    /// Otherwise the explicit set decides, honouring the wildcard.
    #[must_use]
    pub fn grants(&self, permission: &str) -> bool {
        if self.role_type.is_inert() {
            return false;
        }

        self.role_type.has_blanket_authority() || self.permissions.grants(permission)
    }
}
