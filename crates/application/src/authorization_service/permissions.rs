use bidgate_domain::policy;
use bidgate_domain::{BidId, ScopeRequirement};

use super::*;

impl AuthorizationService {
    /// Organization permission check that reports unresolvable scopes.
    ///
    /// Without a target the check asks whether the permission is held anywhere.
    pub async fn evaluate_permission(
        &self,
        subject: &AuthorizationSubject,
        permission: &str,
        target: Option<&Scope>,
    ) -> AppResult<bool> {
        let Some(scope) = target else {
            return Ok(policy::has_permission(
                subject,
                permission,
                ScopeRequirement::Anywhere,
            ));
        };

        let chain = self.resolver.ancestors_of(scope).await?;
        Ok(policy::has_permission(
            subject,
            permission,
            ScopeRequirement::Within(&chain),
        ))
    }

    /// Returns whether the subject holds `permission` at `target`, or anywhere when `None`.
    ///
    /// Resolution failures deny.
    pub async fn has_permission(
        &self,
        subject: &AuthorizationSubject,
        permission: &str,
        target: Option<&Scope>,
    ) -> bool {
        match self.evaluate_permission(subject, permission, target).await {
            Ok(granted) => granted,
            Err(failure) => {
                if let Some(scope) = target {
                    self.record_resolution_failure(subject, scope, &failure)
                        .await;
                }
                false
            }
        }
    }

    /// Bid permission check that reports unresolvable bid scopes.
    ///
    /// Direct management of `bid_id` is honoured before the bid scope is resolved.
    pub async fn evaluate_bid_permission(
        &self,
        subject: &AuthorizationSubject,
        permission: &str,
        bid_id: Option<&BidId>,
        bid_scope: Option<&Scope>,
    ) -> AppResult<bool> {
        if let Some(bid_id) = bid_id
            && policy::manages_bid(subject, permission, bid_id)
        {
            return Ok(true);
        }

        let Some(scope) = bid_scope else {
            return Ok(policy::has_bid_permission(
                subject,
                permission,
                bid_id,
                ScopeRequirement::Anywhere,
            ));
        };

        let chain = self.resolver.ancestors_of(scope).await?;
        Ok(policy::has_bid_permission(
            subject,
            permission,
            bid_id,
            ScopeRequirement::Within(&chain),
        ))
    }

    /// Returns whether the subject may exercise a bid permission.
    ///
    /// Resolution failures deny.
    pub async fn has_bid_permission(
        &self,
        subject: &AuthorizationSubject,
        permission: &str,
        bid_id: Option<&BidId>,
        bid_scope: Option<&Scope>,
    ) -> bool {
        match self
            .evaluate_bid_permission(subject, permission, bid_id, bid_scope)
            .await
        {
            Ok(granted) => granted,
            Err(failure) => {
                if let Some(scope) = bid_scope {
                    self.record_resolution_failure(subject, scope, &failure)
                        .await;
                }
                false
            }
        }
    }
}
