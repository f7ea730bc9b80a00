use std::sync::Arc;

use bidgate_core::{AppError, AppResult};
use bidgate_domain::{AncestorChain, AuditAction, AuthorizationSubject, Scope};
use tracing::{error, warn};

use crate::{AncestryResolver, AuditEvent, AuditRepository, OrganizationDirectory};

mod actions;
mod config;
mod permissions;
mod sections;

#[cfg(test)]
mod tests;

pub use config::AuthorizationConfig;

/// Application service answering authorization checks over subject snapshots.
///
/// Checks never mutate the subject. The only I/O is resolving ancestor chains through
/// the organization directory; when that fails the affected check denies and the
/// failure is logged and audited.
#[derive(Clone)]
pub struct AuthorizationService {
    resolver: AncestryResolver,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn OrganizationDirectory>,
        audit_repository: Arc<dyn AuditRepository>,
        config: AuthorizationConfig,
    ) -> Self {
        Self {
            resolver: AncestryResolver::new(directory, &config),
            audit_repository,
        }
    }

    /// Returns the ancestor chain of a scope.
    pub async fn ancestors_of(&self, scope: &Scope) -> AppResult<AncestorChain> {
        self.resolver.ancestors_of(scope).await
    }

    async fn record_resolution_failure(
        &self,
        subject: &AuthorizationSubject,
        scope: &Scope,
        failure: &AppError,
    ) {
        let action = match failure {
            AppError::ScopeNotFound(_) => AuditAction::AuthorizationScopeUnresolved,
            _ => AuditAction::AuthorizationDirectoryUnavailable,
        };

        warn!(
            principal = subject.principal(),
            scope = %scope,
            error = %failure,
            "scope resolution failed during authorization check, denying"
        );

        let event = AuditEvent {
            subject: subject.principal().to_owned(),
            action,
            resource_type: "organization_scope".to_owned(),
            resource_id: scope.to_string(),
            detail: Some(failure.to_string()),
        };

        if let Err(audit_error) = self.audit_repository.append_event(event).await {
            error!(
                principal = subject.principal(),
                error = %audit_error,
                "failed to append authorization audit event"
            );
        }
    }
}
