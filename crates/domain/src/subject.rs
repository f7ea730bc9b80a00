use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use bidgate_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{BidRole, Role};

/// Identifier of a bid, e.g. `BID-2023-004`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidId(NonEmptyString);

impl BidId {
    /// Creates a validated bid identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value: String = value.into();
        NonEmptyString::new(value.trim()).map(Self)
    }

    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for BidId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Bids a user is directly designated to manage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagedBidSet(BTreeSet<BidId>);

impl ManagedBidSet {
    /// Returns whether the user manages `bid_id`.
    #[must_use]
    pub fn contains(&self, bid_id: &BidId) -> bool {
        self.0.contains(bid_id)
    }

    /// Adds a managed bid.
    pub fn insert(&mut self, bid_id: BidId) -> bool {
        self.0.insert(bid_id)
    }

    /// Iterates managed bids in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &BidId> {
        self.0.iter()
    }

    /// Returns the number of managed bids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the user manages no bids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<BidId> for ManagedBidSet {
    fn from_iter<I: IntoIterator<Item = BidId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Point-in-time authorization snapshot of one user.
///
/// Roles of different scopes are unioned; nothing here is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationSubject {
    principal: String,
    roles: Vec<Role>,
    bid_roles: Vec<BidRole>,
    managed_bids: ManagedBidSet,
}

impl AuthorizationSubject {
    /// Creates a subject with no roles and no managed bids.
    #[must_use]
    pub fn new(principal: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            roles: Vec::new(),
            bid_roles: Vec::new(),
            managed_bids: ManagedBidSet::default(),
        }
    }

    /// Adds an organization role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Adds a bid role.
    #[must_use]
    pub fn with_bid_role(mut self, bid_role: BidRole) -> Self {
        self.bid_roles.push(bid_role);
        self
    }

    /// Adds a directly managed bid.
    #[must_use]
    pub fn with_managed_bid(mut self, bid_id: BidId) -> Self {
        self.managed_bids.insert(bid_id);
        self
    }

    /// Returns the principal label used for logging and audit.
    #[must_use]
    pub fn principal(&self) -> &str {
        self.principal.as_str()
    }

    /// Returns the organization roles.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns the bid roles.
    #[must_use]
    pub fn bid_roles(&self) -> &[BidRole] {
        &self.bid_roles
    }

    /// Returns the directly managed bids, for display.
    ///
    /// Authorization decisions on managed bids go through the bid evaluator.
    #[must_use]
    pub fn managed_bids(&self) -> &ManagedBidSet {
        &self.managed_bids
    }
}
