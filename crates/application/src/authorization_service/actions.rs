use std::collections::HashSet;

use bidgate_domain::policy;
use bidgate_domain::{Action, ResolvedScopes};

use super::*;

impl AuthorizationService {
    /// Single entry point for call sites: may the subject perform `action`?
    ///
    /// Every scope the action names is resolved once. A scope that cannot be
    /// resolved denies the leaves naming it; other leaves still count.
    pub async fn can_perform(&self, subject: &AuthorizationSubject, action: &Action) -> bool {
        let resolved = self.resolve_scopes(subject, action.scopes()).await;
        policy::can_perform(subject, action, &resolved)
    }

    /// Ensures the subject may perform `action`.
    ///
    /// Denials and unresolvable scopes produce the same error.
    pub async fn require(&self, subject: &AuthorizationSubject, action: &Action) -> AppResult<()> {
        if self.can_perform(subject, action).await {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is not allowed to perform this action",
            subject.principal()
        )))
    }

    async fn resolve_scopes(
        &self,
        subject: &AuthorizationSubject,
        scopes: Vec<&Scope>,
    ) -> ResolvedScopes {
        let mut resolved = ResolvedScopes::new();
        let mut attempted = HashSet::new();

        for scope in scopes {
            if !attempted.insert(scope) {
                continue;
            }

            match self.resolver.ancestors_of(scope).await {
                Ok(chain) => resolved.insert(chain),
                Err(failure) => {
                    self.record_resolution_failure(subject, scope, &failure)
                        .await
                }
            }
        }

        resolved
    }
}
