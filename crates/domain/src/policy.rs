//! Pure authorization evaluation over a subject snapshot.
//!
//! Nothing here performs I/O. Scopes named by a check are resolved to ancestor
//! chains beforehand and handed in as a [`ResolvedScopes`] table; a scope missing
//! from the table denies the leaf that named it.

use std::collections::HashMap;

use crate::{
    Action, AncestorChain, AuthorizationSubject, BidId, PortalSection, RoleKind, Scope,
    ScopedRole, is_bid_manager_permission,
};

/// Where a role must sit for its grant to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeRequirement<'a> {
    /// Any role holding the permission counts, wherever it is scoped.
    Anywhere,
    /// Only roles scoped at the target or one of its ancestors count.
    Within(&'a AncestorChain),
    /// The target scope could not be resolved; no role counts.
    Unresolved,
}

/// Ancestor chains resolved for the scopes an evaluation needs.
#[derive(Debug, Clone, Default)]
pub struct ResolvedScopes {
    chains: HashMap<Scope, AncestorChain>,
}

impl ResolvedScopes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the chain of its own target scope.
    pub fn insert(&mut self, chain: AncestorChain) {
        self.chains.insert(chain.target().clone(), chain);
    }

    /// Returns the chain resolved for `scope`.
    #[must_use]
    pub fn chain(&self, scope: &Scope) -> Option<&AncestorChain> {
        self.chains.get(scope)
    }

    /// Maps an optional target onto the requirement a check must satisfy.
    #[must_use]
    pub fn requirement_for(&self, target: Option<&Scope>) -> ScopeRequirement<'_> {
        match target {
            None => ScopeRequirement::Anywhere,
            Some(scope) => self
                .chains
                .get(scope)
                .map(ScopeRequirement::Within)
                .unwrap_or(ScopeRequirement::Unresolved),
        }
    }
}

impl FromIterator<AncestorChain> for ResolvedScopes {
    fn from_iter<I: IntoIterator<Item = AncestorChain>>(iter: I) -> Self {
        let mut resolved = Self::new();
        for chain in iter {
            resolved.insert(chain);
        }
        resolved
    }
}

/// Returns whether any role grants `permission` under `requirement`.
#[must_use]
pub fn roles_grant<K: RoleKind>(
    roles: &[ScopedRole<K>],
    permission: &str,
    requirement: ScopeRequirement<'_>,
) -> bool {
    match requirement {
        ScopeRequirement::Anywhere => roles.iter().any(|role| role.grants(permission)),
        ScopeRequirement::Within(chain) => roles
            .iter()
            .any(|role| chain.contains(role.scope()) && role.grants(permission)),
        ScopeRequirement::Unresolved => false,
    }
}

/// Organization permission check.
#[must_use]
pub fn has_permission(
    subject: &AuthorizationSubject,
    permission: &str,
    requirement: ScopeRequirement<'_>,
) -> bool {
    roles_grant(subject.roles(), permission, requirement)
}

/// Returns whether the subject directly manages `bid_id` and that grants `permission`.
#[must_use]
pub fn manages_bid(subject: &AuthorizationSubject, permission: &str, bid_id: &BidId) -> bool {
    is_bid_manager_permission(permission) && subject.managed_bids().contains(bid_id)
}

/// Bid permission check.
///
/// Direct management of the bid is checked first and independently of bid roles, so
/// it holds even when the bid scope is unresolved or the subject has no bid role.
#[must_use]
pub fn has_bid_permission(
    subject: &AuthorizationSubject,
    permission: &str,
    bid_id: Option<&BidId>,
    requirement: ScopeRequirement<'_>,
) -> bool {
    let owned = bid_id.is_some_and(|bid_id| manages_bid(subject, permission, bid_id));
    owned || roles_grant(subject.bid_roles(), permission, requirement)
}

/// Evaluates an action against the subject.
#[must_use]
pub fn can_perform(
    subject: &AuthorizationSubject,
    action: &Action,
    scopes: &ResolvedScopes,
) -> bool {
    match action {
        Action::Organization { permission, target } => {
            has_permission(subject, permission, scopes.requirement_for(target.as_ref()))
        }
        Action::Bid { permission, target } => has_bid_permission(
            subject,
            permission,
            target.bid_id(),
            scopes.requirement_for(target.scope()),
        ),
        Action::AnyOf { actions } => actions
            .iter()
            .any(|action| can_perform(subject, action, scopes)),
        Action::AllOf { actions } => {
            !actions.is_empty()
                && actions
                    .iter()
                    .all(|action| can_perform(subject, action, scopes))
        }
    }
}

/// Returns the portal sections the subject may see, in navigation order.
///
/// Managing at least one bid makes the bid section visible.
#[must_use]
pub fn visible_sections(subject: &AuthorizationSubject) -> Vec<PortalSection> {
    let unscoped = ResolvedScopes::new();
    PortalSection::all()
        .iter()
        .copied()
        .filter(|section| {
            (*section == PortalSection::Bids && !subject.managed_bids().is_empty())
                || can_perform(subject, &section.visibility_action(), &unscoped)
        })
        .collect()
}
