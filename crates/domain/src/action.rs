use serde::Serialize;

use crate::{BidId, Permission, Scope};

/// The bid an action targets, as far as the caller knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BidTarget {
    bid_id: Option<BidId>,
    scope: Option<Scope>,
}

impl BidTarget {
    /// Targets no particular bid, e.g. creating a new one.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Targets a bid by identifier.
    #[must_use]
    pub fn bid(bid_id: BidId) -> Self {
        Self {
            bid_id: Some(bid_id),
            scope: None,
        }
    }

    /// Targets bids owned by an organizational scope.
    #[must_use]
    pub fn within(scope: Scope) -> Self {
        Self {
            bid_id: None,
            scope: Some(scope),
        }
    }

    /// Records the organizational scope owning the bid.
    #[must_use]
    pub fn owned_by(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the bid identifier, if known.
    #[must_use]
    pub fn bid_id(&self) -> Option<&BidId> {
        self.bid_id.as_ref()
    }

    /// Returns the owning scope, if known.
    #[must_use]
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }
}

/// Something a caller wants to do, with the organizational and bid semantics it needs.
///
/// Leaves name one permission checked by one evaluator; compositions combine
/// leaves. Empty compositions deny.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Checked against organization roles.
    Organization {
        /// Permission name.
        permission: String,
        /// Scope the action touches; `None` asks whether the permission is held anywhere.
        target: Option<Scope>,
    },
    /// Checked against bid roles and directly managed bids.
    Bid {
        /// Permission name.
        permission: String,
        /// Bid the action touches.
        target: BidTarget,
    },
    /// Granted when any member is granted.
    AnyOf {
        /// Alternatives.
        actions: Vec<Action>,
    },
    /// Granted when every member is granted.
    AllOf {
        /// Requirements.
        actions: Vec<Action>,
    },
}

impl Action {
    /// Builds an organization-scoped leaf.
    #[must_use]
    pub fn organization(permission: impl AsRef<str>, target: Option<Scope>) -> Self {
        Self::Organization {
            permission: permission.as_ref().to_owned(),
            target,
        }
    }

    /// Builds a bid-scoped leaf.
    #[must_use]
    pub fn bid(permission: impl AsRef<str>, target: BidTarget) -> Self {
        Self::Bid {
            permission: permission.as_ref().to_owned(),
            target,
        }
    }

    /// Builds an alternative.
    #[must_use]
    pub fn any_of(actions: Vec<Action>) -> Self {
        Self::AnyOf { actions }
    }

    /// Builds a conjunction.
    #[must_use]
    pub fn all_of(actions: Vec<Action>) -> Self {
        Self::AllOf { actions }
    }

    /// Viewing bids: bid roles, managed bids, or organization roles over the bid's scope.
    #[must_use]
    pub fn view_bids(target: BidTarget) -> Self {
        Self::bid_or_organization(Permission::ViewBids, target)
    }

    /// Creating bids within a scope.
    #[must_use]
    pub fn create_bids(scope: Option<Scope>) -> Self {
        let target = match scope {
            Some(scope) => BidTarget::within(scope),
            None => BidTarget::any(),
        };
        Self::bid_or_organization(Permission::CreateBids, target)
    }

    /// Editing a bid.
    #[must_use]
    pub fn edit_bids(target: BidTarget) -> Self {
        Self::bid_or_organization(Permission::EditBids, target)
    }

    /// Awarding a bid. Only bid authority counts.
    #[must_use]
    pub fn award_bids(target: BidTarget) -> Self {
        Self::bid(Permission::AwardBids, target)
    }

    /// Assigning managers to bids within a scope.
    #[must_use]
    pub fn assign_bid_managers(scope: Option<Scope>) -> Self {
        let target = match scope {
            Some(scope) => BidTarget::within(scope),
            None => BidTarget::any(),
        };
        Self::bid_or_organization(Permission::AssignBidManagers, target)
    }

    /// Managing the evaluation committee of a bid.
    #[must_use]
    pub fn manage_committee_members(target: BidTarget) -> Self {
        Self::bid_or_organization(Permission::ManageCommitteeMembers, target)
    }

    /// Editing bid categories. Categories are shared, so the check is unscoped.
    #[must_use]
    pub fn edit_categories() -> Self {
        Self::organization(Permission::EditCategories, None)
    }

    /// Viewing a district.
    #[must_use]
    pub fn view_district(district: Scope) -> Self {
        Self::organization(Permission::ViewDistrict, Some(district))
    }

    /// Editing a district.
    #[must_use]
    pub fn edit_district(district: Scope) -> Self {
        Self::organization(Permission::EditDistrict, Some(district))
    }

    /// Viewing a school.
    #[must_use]
    pub fn view_school(school: Scope) -> Self {
        Self::organization(Permission::ViewSchool, Some(school))
    }

    /// Editing a school.
    #[must_use]
    pub fn edit_school(school: Scope) -> Self {
        Self::organization(Permission::EditSchool, Some(school))
    }

    /// Managing users within a scope, or anywhere when `None`.
    #[must_use]
    pub fn manage_users(scope: Option<Scope>) -> Self {
        Self::organization(Permission::ManageUsers, scope)
    }

    /// Opening reports within a scope, or anywhere when `None`.
    #[must_use]
    pub fn view_reports(scope: Option<Scope>) -> Self {
        Self::organization(Permission::ViewReports, scope)
    }

    /// Returns every scope named by the action's leaves.
    #[must_use]
    pub fn scopes(&self) -> Vec<&Scope> {
        let mut scopes = Vec::new();
        self.collect_scopes(&mut scopes);
        scopes
    }

    fn collect_scopes<'a>(&'a self, scopes: &mut Vec<&'a Scope>) {
        match self {
            Self::Organization { target, .. } => scopes.extend(target.as_ref()),
            Self::Bid { target, .. } => scopes.extend(target.scope()),
            Self::AnyOf { actions } | Self::AllOf { actions } => {
                for action in actions {
                    action.collect_scopes(scopes);
                }
            }
        }
    }

    // The organization leg is only added once the owning scope is known, so an
    // organization role never reaches a bid through the unscoped form.
    fn bid_or_organization(permission: Permission, target: BidTarget) -> Self {
        match target.scope().cloned() {
            Some(scope) => Self::any_of(vec![
                Self::bid(permission, target),
                Self::organization(permission, Some(scope)),
            ]),
            None => Self::bid(permission, target),
        }
    }
}
