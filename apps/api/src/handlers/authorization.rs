use axum::Json;
use axum::extract::{Path, State};
use bidgate_application::SubjectSnapshot;
use bidgate_domain::BidId;

use crate::dto::{
    AuthorizationDecisionResponse, BidPermissionCheckRequest, CanPerformRequest,
    ManagedBidsResponse, PermissionCheckRequest, PortalSectionsResponse, ScopeDto,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn check_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<PermissionCheckRequest>,
) -> ApiResult<Json<AuthorizationDecisionResponse>> {
    let snapshot = state
        .subject_service
        .snapshot(payload.principal.as_str())
        .await?;
    let scope = payload.scope.map(ScopeDto::into_scope).transpose()?;

    let allowed = state
        .authorization_service
        .has_permission(&snapshot.subject, payload.permission.as_str(), scope.as_ref())
        .await;

    Ok(Json(decision(snapshot, allowed)))
}

pub async fn check_bid_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<BidPermissionCheckRequest>,
) -> ApiResult<Json<AuthorizationDecisionResponse>> {
    let snapshot = state
        .subject_service
        .snapshot(payload.principal.as_str())
        .await?;
    let bid_id = payload.bid_id.map(BidId::new).transpose()?;
    let bid_scope = payload.bid_scope.map(ScopeDto::into_scope).transpose()?;

    let allowed = state
        .authorization_service
        .has_bid_permission(
            &snapshot.subject,
            payload.permission.as_str(),
            bid_id.as_ref(),
            bid_scope.as_ref(),
        )
        .await;

    Ok(Json(decision(snapshot, allowed)))
}

pub async fn can_perform_handler(
    State(state): State<AppState>,
    Json(payload): Json<CanPerformRequest>,
) -> ApiResult<Json<AuthorizationDecisionResponse>> {
    let action = payload.action.into_action()?;
    let snapshot = state
        .subject_service
        .snapshot(payload.principal.as_str())
        .await?;

    let allowed = state
        .authorization_service
        .can_perform(&snapshot.subject, &action)
        .await;

    Ok(Json(decision(snapshot, allowed)))
}

pub async fn visible_sections_handler(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> ApiResult<Json<PortalSectionsResponse>> {
    let snapshot = state.subject_service.snapshot(principal.as_str()).await?;
    let sections = state
        .authorization_service
        .visible_sections(&snapshot.subject);

    Ok(Json(PortalSectionsResponse::new(
        snapshot.subject.principal().to_owned(),
        &sections,
    )))
}

pub async fn managed_bids_handler(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> ApiResult<Json<ManagedBidsResponse>> {
    let snapshot = state.subject_service.snapshot(principal.as_str()).await?;

    Ok(Json(ManagedBidsResponse {
        principal: snapshot.subject.principal().to_owned(),
        bid_ids: snapshot
            .subject
            .managed_bids()
            .iter()
            .map(|bid_id| bid_id.as_str().to_owned())
            .collect(),
    }))
}

fn decision(snapshot: SubjectSnapshot, allowed: bool) -> AuthorizationDecisionResponse {
    AuthorizationDecisionResponse {
        principal: snapshot.subject.principal().to_owned(),
        allowed,
        snapshot_captured_at: snapshot.captured_at.to_rfc3339(),
    }
}
