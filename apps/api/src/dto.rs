use std::str::FromStr;

use bidgate_core::{AppError, AppResult};
use bidgate_domain::{Action, BidId, BidTarget, PortalSection, Scope, ScopeType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Organizational scope coordinate on the wire.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scope-dto.ts"
)]
pub struct ScopeDto {
    #[serde(rename = "type")]
    pub scope_type: String,
    pub id: String,
}

impl ScopeDto {
    pub fn into_scope(self) -> AppResult<Scope> {
        Scope::new(ScopeType::from_str(self.scope_type.as_str())?, self.id)
    }
}

/// Incoming payload for an organization permission check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-check-request.ts"
)]
pub struct PermissionCheckRequest {
    pub principal: String,
    pub permission: String,
    pub scope: Option<ScopeDto>,
}

/// Incoming payload for a bid permission check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bid-permission-check-request.ts"
)]
pub struct BidPermissionCheckRequest {
    pub principal: String,
    pub permission: String,
    pub bid_id: Option<String>,
    pub bid_scope: Option<ScopeDto>,
}

/// Action description accepted by the facade endpoint.
#[derive(Debug, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/action-request.ts"
)]
pub enum ActionRequest {
    Organization {
        permission: String,
        scope: Option<ScopeDto>,
    },
    Bid {
        permission: String,
        bid_id: Option<String>,
        bid_scope: Option<ScopeDto>,
    },
    Catalog {
        name: String,
        bid_id: Option<String>,
        scope: Option<ScopeDto>,
    },
    AnyOf {
        actions: Vec<ActionRequest>,
    },
    AllOf {
        actions: Vec<ActionRequest>,
    },
}

impl ActionRequest {
    pub fn into_action(self) -> AppResult<Action> {
        match self {
            Self::Organization { permission, scope } => {
                Ok(Action::organization(permission, optional_scope(scope)?))
            }
            Self::Bid {
                permission,
                bid_id,
                bid_scope,
            } => Ok(Action::bid(permission, bid_target(bid_id, bid_scope)?)),
            Self::Catalog {
                name,
                bid_id,
                scope,
            } => catalog_action(name.as_str(), bid_id, scope),
            Self::AnyOf { actions } => Ok(Action::any_of(into_actions(actions)?)),
            Self::AllOf { actions } => Ok(Action::all_of(into_actions(actions)?)),
        }
    }
}

/// Incoming payload for the facade endpoint.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/can-perform-request.ts"
)]
pub struct CanPerformRequest {
    pub principal: String,
    pub action: ActionRequest,
}

/// Authorization verdict.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/authorization-decision-response.ts"
)]
pub struct AuthorizationDecisionResponse {
    pub principal: String,
    pub allowed: bool,
    pub snapshot_captured_at: String,
}

/// Portal sections visible to a subject.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/portal-sections-response.ts"
)]
pub struct PortalSectionsResponse {
    pub principal: String,
    pub sections: Vec<String>,
}

impl PortalSectionsResponse {
    pub fn new(principal: String, sections: &[PortalSection]) -> Self {
        Self {
            principal,
            sections: sections
                .iter()
                .map(|section| section.as_str().to_owned())
                .collect(),
        }
    }
}

/// Bids a subject manages directly.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/managed-bids-response.ts"
)]
pub struct ManagedBidsResponse {
    pub principal: String,
    pub bid_ids: Vec<String>,
}

fn optional_scope(scope: Option<ScopeDto>) -> AppResult<Option<Scope>> {
    scope.map(ScopeDto::into_scope).transpose()
}

fn required_scope(name: &str, scope: Option<ScopeDto>) -> AppResult<Scope> {
    optional_scope(scope)?
        .ok_or_else(|| AppError::Validation(format!("action '{name}' requires a scope")))
}

fn bid_target(
    bid_id: Option<String>,
    bid_scope: Option<ScopeDto>,
) -> AppResult<BidTarget> {
    let target = match bid_id {
        Some(bid_id) => BidTarget::bid(BidId::new(bid_id)?),
        None => BidTarget::any(),
    };

    Ok(match optional_scope(bid_scope)? {
        Some(scope) => target.owned_by(scope),
        None => target,
    })
}

fn into_actions(actions: Vec<ActionRequest>) -> AppResult<Vec<Action>> {
    actions.into_iter().map(ActionRequest::into_action).collect()
}

fn catalog_action(name: &str, bid_id: Option<String>, scope: Option<ScopeDto>) -> AppResult<Action> {
    match name {
        "view_bids" => Ok(Action::view_bids(bid_target(bid_id, scope)?)),
        "edit_bids" => Ok(Action::edit_bids(bid_target(bid_id, scope)?)),
        "award_bids" => Ok(Action::award_bids(bid_target(bid_id, scope)?)),
        "manage_committee_members" => {
            Ok(Action::manage_committee_members(bid_target(bid_id, scope)?))
        }
        "create_bids" => Ok(Action::create_bids(optional_scope(scope)?)),
        "assign_bid_managers" => Ok(Action::assign_bid_managers(optional_scope(scope)?)),
        "manage_users" => Ok(Action::manage_users(optional_scope(scope)?)),
        "view_reports" => Ok(Action::view_reports(optional_scope(scope)?)),
        "edit_categories" => Ok(Action::edit_categories()),
        "view_district" => Ok(Action::view_district(required_scope(name, scope)?)),
        "edit_district" => Ok(Action::edit_district(required_scope(name, scope)?)),
        "view_school" => Ok(Action::view_school(required_scope(name, scope)?)),
        "edit_school" => Ok(Action::edit_school(required_scope(name, scope)?)),
        _ => Err(AppError::Validation(format!("unknown action '{name}'"))),
    }
}
