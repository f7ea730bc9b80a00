//! Domain types and pure authorization policy.

#![forbid(unsafe_code)]

mod action;
mod audit;
mod permission;
pub mod policy;
mod role;
mod scope;
mod section;
mod subject;

pub use action::{Action, BidTarget};
pub use audit::AuditAction;
pub use permission::{Permission, PermissionSet, WILDCARD_PERMISSION, is_bid_manager_permission};
pub use policy::{ResolvedScopes, ScopeRequirement};
pub use role::{BidRole, BidRoleType, Role, RoleKind, RoleType, ScopedRole};
pub use scope::{AncestorChain, SYSTEM_SCOPE_ID, Scope, ScopeType};
pub use section::PortalSection;
pub use subject::{AuthorizationSubject, BidId, ManagedBidSet};
