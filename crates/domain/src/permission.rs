use std::collections::BTreeSet;
use std::str::FromStr;

use bidgate_core::AppError;
use serde::{Deserialize, Serialize};

/// Permission value that grants every permission of the role holding it.
pub const WILDCARD_PERMISSION: &str = "all";

/// Permissions checked by portal call sites.
///
/// Role permission sets are open strings; this catalog names the ones the portal
/// itself asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows listing and opening bids.
    ViewBids,
    /// Allows creating bids.
    CreateBids,
    /// Allows editing bid details.
    EditBids,
    /// Allows awarding bids to vendors.
    AwardBids,
    /// Allows assigning bid managers.
    AssignBidManagers,
    /// Allows editing bid categories.
    EditCategories,
    /// Allows viewing district details.
    ViewDistrict,
    /// Allows editing district details.
    EditDistrict,
    /// Allows viewing school details.
    ViewSchool,
    /// Allows editing school details.
    EditSchool,
    /// Allows managing portal users.
    ManageUsers,
    /// Allows managing committee members.
    ManageCommitteeMembers,
    /// Allows opening reports.
    ViewReports,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewBids => "view_bids",
            Self::CreateBids => "create_bids",
            Self::EditBids => "edit_bids",
            Self::AwardBids => "award_bids",
            Self::AssignBidManagers => "assign_bid_managers",
            Self::EditCategories => "edit_categories",
            Self::ViewDistrict => "view_district",
            Self::EditDistrict => "edit_district",
            Self::ViewSchool => "view_school",
            Self::EditSchool => "edit_school",
            Self::ManageUsers => "manage_users",
            Self::ManageCommitteeMembers => "manage_committee_members",
            Self::ViewReports => "view_reports",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ViewBids,
            Permission::CreateBids,
            Permission::EditBids,
            Permission::AwardBids,
            Permission::AssignBidManagers,
            Permission::EditCategories,
            Permission::ViewDistrict,
            Permission::EditDistrict,
            Permission::ViewSchool,
            Permission::EditSchool,
            Permission::ManageUsers,
            Permission::ManageCommitteeMembers,
            Permission::ViewReports,
        ];

        ALL
    }
}

/// Returns whether being the designated manager of a bid grants `permission` on it.
#[must_use]
pub fn is_bid_manager_permission(permission: &str) -> bool {
    matches!(permission, "edit_bids" | "award_bids" | "view_bids")
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Explicit permission strings attached to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether the set names `permission` or holds the wildcard.
    #[must_use]
    pub fn grants(&self, permission: &str) -> bool {
        self.0.contains(WILDCARD_PERMISSION) || self.0.contains(permission)
    }

    /// Returns whether the set holds the wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.0.contains(WILDCARD_PERMISSION)
    }

    /// Iterates the stored permission strings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(Into::into)
                .map(|value: String| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Permission, PermissionSet, is_bid_manager_permission};

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert_eq!(restored.ok(), Some(*permission));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_str("edit_everything").is_err());
    }

    #[test]
    fn wildcard_grants_any_permission() {
        let permissions: PermissionSet = ["all"].into_iter().collect();
        assert!(permissions.grants("edit_district"));
        assert!(permissions.grants("something_custom"));
    }

    #[test]
    fn blank_entries_are_dropped() {
        let permissions: PermissionSet = [" view_bids ", "  ", ""].into_iter().collect();
        assert_eq!(permissions.iter().collect::<Vec<_>>(), vec!["view_bids"]);
        assert!(permissions.grants("view_bids"));
        assert!(!permissions.grants(""));
    }

    #[test]
    fn bid_manager_permissions_cover_edit_award_and_view() {
        assert!(is_bid_manager_permission(Permission::EditBids.as_str()));
        assert!(is_bid_manager_permission(Permission::AwardBids.as_str()));
        assert!(is_bid_manager_permission(Permission::ViewBids.as_str()));
        assert!(!is_bid_manager_permission(Permission::CreateBids.as_str()));
        assert!(!is_bid_manager_permission(Permission::AssignBidManagers.as_str()));
    }
}
