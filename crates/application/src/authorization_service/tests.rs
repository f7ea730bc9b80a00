use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bidgate_core::{AppError, AppResult};
use bidgate_domain::{
    Action, AuditAction, AuthorizationSubject, BidId, BidRole, BidRoleType, BidTarget,
    PermissionSet, PortalSection, Role, RoleType, Scope,
};
use tokio::sync::Mutex;

use crate::{AuditEvent, AuditRepository, DirectoryEntry, OrganizationDirectory};

use super::{AuthorizationConfig, AuthorizationService};

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct FailingAuditRepository;

#[async_trait]
impl AuditRepository for FailingAuditRepository {
    async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
        Err(AppError::Internal("audit store offline".to_owned()))
    }
}

#[derive(Default)]
struct FakeDirectory {
    parents: HashMap<Scope, Option<Scope>>,
    delay: Option<Duration>,
}

#[async_trait]
impl OrganizationDirectory for FakeDirectory {
    async fn find_scope(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.parents.get(scope).map(|parent| DirectoryEntry {
            scope: scope.clone(),
            parent: parent.clone(),
        }))
    }
}

fn scope(result: AppResult<Scope>) -> Scope {
    match result {
        Ok(scope) => scope,
        Err(error) => panic!("invalid test scope: {error}"),
    }
}

fn bid(value: &str) -> BidId {
    match BidId::new(value) {
        Ok(bid_id) => bid_id,
        Err(error) => panic!("invalid test bid id: {error}"),
    }
}

fn permissions(values: &[&str]) -> PermissionSet {
    values.iter().copied().collect()
}

/// C1 > D2 > S9 and D17, D18 directly under the root.
fn directory() -> FakeDirectory {
    FakeDirectory {
        parents: HashMap::from([
            (scope(Scope::cooperative("C1")), None),
            (
                scope(Scope::district("D2")),
                Some(scope(Scope::cooperative("C1"))),
            ),
            (
                scope(Scope::school("S9")),
                Some(scope(Scope::district("D2"))),
            ),
            (scope(Scope::district("D17")), None),
            (scope(Scope::district("D18")), None),
        ]),
        delay: None,
    }
}

fn service_with(
    directory: FakeDirectory,
    audit_repository: Arc<FakeAuditRepository>,
) -> AuthorizationService {
    AuthorizationService::new(
        Arc::new(directory),
        audit_repository,
        AuthorizationConfig::default(),
    )
}

fn service() -> AuthorizationService {
    service_with(directory(), Arc::new(FakeAuditRepository::default()))
}

#[tokio::test]
async fn district_admin_may_edit_own_district_only() {
    let service = service();
    let subject = AuthorizationSubject::new("alice").with_role(Role::new(
        RoleType::DistrictAdmin,
        scope(Scope::district("D17")),
        permissions(&["view_district"]),
    ));

    assert!(
        service
            .has_permission(&subject, "edit_district", Some(&scope(Scope::district("D17"))))
            .await
    );
    assert!(
        !service
            .has_permission(&subject, "edit_district", Some(&scope(Scope::district("D18"))))
            .await
    );
}

#[tokio::test]
async fn empty_subject_is_denied() {
    let service = service();
    let subject = AuthorizationSubject::new("nobody");

    assert!(!service.has_permission(&subject, "view_bids", None).await);
    assert!(
        !service
            .has_bid_permission(&subject, "view_bids", Some(&bid("BID-2023-004")), None)
            .await
    );
}

#[tokio::test]
async fn managed_bid_grants_award_without_bid_roles() {
    let service = service();
    let subject = AuthorizationSubject::new("bob").with_managed_bid(bid("BID-2023-004"));

    assert!(
        service
            .has_bid_permission(&subject, "award_bids", Some(&bid("BID-2023-004")), None)
            .await
    );
    assert!(
        !service
            .has_bid_permission(&subject, "award_bids", Some(&bid("BID-2023-005")), None)
            .await
    );
}

#[tokio::test]
async fn managed_bid_is_honoured_before_scope_resolution() {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = service_with(directory(), audit_repository.clone());
    let subject = AuthorizationSubject::new("bob").with_managed_bid(bid("BID-2023-004"));

    let granted = service
        .evaluate_bid_permission(
            &subject,
            "edit_bids",
            Some(&bid("BID-2023-004")),
            Some(&scope(Scope::school("S404"))),
        )
        .await;

    assert!(matches!(granted, Ok(true)));
    assert!(audit_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn bid_administrator_at_cooperative_reaches_school_bid() {
    let service = service();
    let subject = AuthorizationSubject::new("carol").with_bid_role(BidRole::new(
        BidRoleType::BidAdministrator,
        scope(Scope::cooperative("C1")),
        PermissionSet::empty(),
    ));

    assert!(
        service
            .has_bid_permission(
                &subject,
                "award_bids",
                Some(&bid("BID-2023-010")),
                Some(&scope(Scope::school("S9"))),
            )
            .await
    );
}

#[tokio::test]
async fn unknown_scope_is_reported_by_evaluate_and_denied_by_has() {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = service_with(directory(), audit_repository.clone());
    let subject = AuthorizationSubject::new("dave").with_role(Role::new(
        RoleType::CooperativeAdmin,
        Scope::system(),
        permissions(&["all"]),
    ));
    let unknown = scope(Scope::school("S404"));

    let evaluated = service
        .evaluate_permission(&subject, "edit_school", Some(&unknown))
        .await;
    assert!(matches!(evaluated, Err(AppError::ScopeNotFound(_))));

    assert!(
        !service
            .has_permission(&subject, "edit_school", Some(&unknown))
            .await
    );

    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::AuthorizationScopeUnresolved);
    assert_eq!(events[0].subject, "dave");
    assert_eq!(events[0].resource_id, "school:S404");
}

#[tokio::test(start_paused = true)]
async fn slow_directory_fails_closed() {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let mut slow_directory = directory();
    slow_directory.delay = Some(Duration::from_secs(2));
    let service = service_with(slow_directory, audit_repository.clone());
    let subject = AuthorizationSubject::new("erin").with_role(Role::new(
        RoleType::CooperativeAdmin,
        Scope::system(),
        permissions(&["all"]),
    ));

    assert!(
        !service
            .has_permission(&subject, "edit_district", Some(&scope(Scope::district("D17"))))
            .await
    );

    let events = audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].action,
        AuditAction::AuthorizationDirectoryUnavailable
    );
}

#[tokio::test]
async fn audit_failure_does_not_change_verdict() {
    let service = AuthorizationService::new(
        Arc::new(directory()),
        Arc::new(FailingAuditRepository),
        AuthorizationConfig::default(),
    );
    let subject = AuthorizationSubject::new("frank").with_managed_bid(bid("BID-2023-004"));

    let action = Action::edit_bids(
        BidTarget::bid(bid("BID-2023-004")).owned_by(scope(Scope::school("S404"))),
    );
    assert!(service.can_perform(&subject, &action).await);
}

#[tokio::test]
async fn can_perform_combines_organization_and_bid_authority() {
    let service = service();
    let district_admin = AuthorizationSubject::new("grace").with_role(Role::new(
        RoleType::DistrictAdmin,
        scope(Scope::district("D2")),
        PermissionSet::empty(),
    ));
    let bid_manager = AuthorizationSubject::new("heidi").with_bid_role(BidRole::new(
        BidRoleType::BidManager,
        scope(Scope::district("D2")),
        permissions(&["edit_bids"]),
    ));
    let outsider = AuthorizationSubject::new("ivan").with_role(Role::new(
        RoleType::DistrictAdmin,
        scope(Scope::district("D17")),
        PermissionSet::empty(),
    ));

    let action = Action::edit_bids(
        BidTarget::bid(bid("BID-2023-010")).owned_by(scope(Scope::school("S9"))),
    );

    assert!(service.can_perform(&district_admin, &action).await);
    assert!(service.can_perform(&bid_manager, &action).await);
    assert!(!service.can_perform(&outsider, &action).await);
}

#[tokio::test]
async fn repeated_scope_is_resolved_and_audited_once() {
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = service_with(directory(), audit_repository.clone());
    let subject = AuthorizationSubject::new("judy");
    let unknown = scope(Scope::school("S404"));

    let action = Action::any_of(vec![
        Action::edit_school(unknown.clone()),
        Action::view_school(unknown),
    ]);
    assert!(!service.can_perform(&subject, &action).await);
    assert_eq!(audit_repository.events.lock().await.len(), 1);
}

#[tokio::test]
async fn require_returns_forbidden_for_denials() {
    let service = service();
    let subject = AuthorizationSubject::new("ken").with_role(Role::new(
        RoleType::Viewer,
        scope(Scope::district("D17")),
        permissions(&["view_district"]),
    ));

    let allowed = service
        .require(&subject, &Action::view_district(scope(Scope::district("D17"))))
        .await;
    let denied = service
        .require(&subject, &Action::edit_district(scope(Scope::district("D17"))))
        .await;
    let unknown = service
        .require(&subject, &Action::view_district(scope(Scope::district("D404"))))
        .await;

    assert!(allowed.is_ok());
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    let (Err(denied), Err(unknown)) = (denied, unknown) else {
        panic!("expected both checks to be denied");
    };
    assert_eq!(denied.to_string(), unknown.to_string());
}

#[tokio::test]
async fn repeated_checks_return_the_same_verdict() {
    let service = service();
    let subject = AuthorizationSubject::new("leo").with_role(Role::new(
        RoleType::SchoolAdmin,
        scope(Scope::school("S9")),
        PermissionSet::empty(),
    ));
    let action = Action::edit_school(scope(Scope::school("S9")));

    let first = service.can_perform(&subject, &action).await;
    let second = service.can_perform(&subject, &action).await;
    assert!(first);
    assert_eq!(first, second);
}

#[test]
fn visible_sections_follow_subject_grants() {
    let service = service();
    let subject = AuthorizationSubject::new("mallory").with_bid_role(BidRole::new(
        BidRoleType::BidViewer,
        scope(Scope::district("D2")),
        permissions(&["view_bids"]),
    ));

    assert_eq!(service.visible_sections(&subject), vec![PortalSection::Bids]);
}

#[test]
fn zero_directory_timeout_is_rejected() {
    assert!(AuthorizationConfig::new(Duration::ZERO).is_err());
    assert!(AuthorizationConfig::new(Duration::from_millis(50)).is_ok());
}
