use std::sync::Arc;
use std::time::Duration;

use bidgate_core::{AppError, AppResult};
use bidgate_domain::{AncestorChain, Scope};

use crate::{AuthorizationConfig, DirectoryEntry, OrganizationDirectory};

// School, district and cooperative; the root is never looked up.
const MAX_LOOKUPS: usize = 3;

/// Resolves a scope to its ancestor chain with one directory lookup per level.
#[derive(Clone)]
pub struct AncestryResolver {
    directory: Arc<dyn OrganizationDirectory>,
    lookup_timeout: Duration,
}

impl AncestryResolver {
    /// Creates a resolver over an organization directory.
    #[must_use]
    pub fn new(directory: Arc<dyn OrganizationDirectory>, config: &AuthorizationConfig) -> Self {
        Self {
            directory,
            lookup_timeout: config.directory_lookup_timeout(),
        }
    }

    /// Returns `[scope, parent, ..., system]`.
    ///
    /// Fails with [`AppError::ScopeNotFound`] when the directory does not know `scope`.
    /// Any other failure, including a lookup exceeding the configured timeout, is
    /// reported as [`AppError::Internal`].
    pub async fn ancestors_of(&self, scope: &Scope) -> AppResult<AncestorChain> {
        if scope.is_system() {
            return Ok(AncestorChain::system());
        }

        let mut scopes = Vec::with_capacity(MAX_LOOKUPS + 1);
        let mut current = scope.clone();

        for _ in 0..MAX_LOOKUPS {
            let entry = self.lookup(&current).await?.ok_or_else(|| {
                if scopes.is_empty() {
                    AppError::ScopeNotFound(current.to_string())
                } else {
                    AppError::Internal(format!(
                        "organization directory has no entry for '{current}', parent of '{scope}'"
                    ))
                }
            })?;

            if entry.scope != current {
                return Err(AppError::Internal(format!(
                    "organization directory answered '{}' for '{current}'",
                    entry.scope
                )));
            }

            scopes.push(entry.scope);
            match entry.parent {
                Some(parent) if !parent.is_system() => current = parent,
                _ => {
                    scopes.push(Scope::system());
                    return AncestorChain::new(scopes).map_err(|error| {
                        AppError::Internal(format!(
                            "organization directory returned an invalid ancestry for '{scope}': {error}"
                        ))
                    });
                }
            }
        }

        Err(AppError::Internal(format!(
            "ancestry of '{scope}' is deeper than the organization hierarchy allows"
        )))
    }

    async fn lookup(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>> {
        tokio::time::timeout(self.lookup_timeout, self.directory.find_scope(scope))
            .await
            .map_err(|_| {
                AppError::Internal(format!(
                    "organization directory lookup for '{scope}' timed out after {}ms",
                    self.lookup_timeout.as_millis()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use bidgate_core::{AppError, AppResult};
    use bidgate_domain::Scope;

    use super::AncestryResolver;
    use crate::{AuthorizationConfig, DirectoryEntry, OrganizationDirectory};

    fn scope(result: AppResult<Scope>) -> Scope {
        match result {
            Ok(scope) => scope,
            Err(error) => panic!("invalid test scope: {error}"),
        }
    }

    #[derive(Default)]
    struct FakeDirectory {
        parents: HashMap<Scope, Option<Scope>>,
        lookups: AtomicUsize,
        delay: Option<Duration>,
    }

    impl FakeDirectory {
        fn with(mut self, child: Scope, parent: Option<Scope>) -> Self {
            self.parents.insert(child, parent);
            self
        }
    }

    #[async_trait]
    impl OrganizationDirectory for FakeDirectory {
        async fn find_scope(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            Ok(self.parents.get(scope).map(|parent| DirectoryEntry {
                scope: scope.clone().with_name(format!("{} name", scope.id())),
                parent: parent.clone(),
            }))
        }
    }

    fn resolver(directory: Arc<FakeDirectory>) -> AncestryResolver {
        AncestryResolver::new(directory, &AuthorizationConfig::default())
    }

    fn hierarchy() -> FakeDirectory {
        FakeDirectory::default()
            .with(scope(Scope::cooperative("C1")), None)
            .with(
                scope(Scope::district("D2")),
                Some(scope(Scope::cooperative("C1"))),
            )
            .with(
                scope(Scope::school("S9")),
                Some(scope(Scope::district("D2"))),
            )
            .with(scope(Scope::district("D17")), Some(Scope::system()))
            .with(
                scope(Scope::school("S10")),
                Some(scope(Scope::district("D17"))),
            )
    }

    #[tokio::test]
    async fn school_resolves_through_district_and_cooperative() {
        let directory = Arc::new(hierarchy());
        let chain = resolver(directory.clone())
            .ancestors_of(&scope(Scope::school("S9")))
            .await;

        let ids: Vec<String> = chain
            .map(|chain| chain.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        assert_eq!(
            ids,
            vec!["school:S9", "district:D2", "cooperative:C1", "system:system"]
        );
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cooperative_step_is_omitted_for_independent_district() {
        let chain = resolver(Arc::new(hierarchy()))
            .ancestors_of(&scope(Scope::school("S10")))
            .await;

        assert_eq!(chain.map(|chain| chain.len()).ok(), Some(3));
    }

    #[tokio::test]
    async fn resolved_chain_carries_directory_names() {
        let chain = resolver(Arc::new(hierarchy()))
            .ancestors_of(&scope(Scope::district("D2")))
            .await;

        let names: Vec<Option<String>> = chain
            .map(|chain| chain.iter().map(|value| value.name().map(str::to_owned)).collect())
            .unwrap_or_default();
        assert_eq!(
            names,
            vec![Some("D2 name".to_owned()), Some("C1 name".to_owned()), None]
        );
    }

    #[tokio::test]
    async fn system_scope_needs_no_lookup() {
        let directory = Arc::new(FakeDirectory::default());
        let chain = resolver(directory.clone())
            .ancestors_of(&Scope::system())
            .await;

        assert_eq!(chain.map(|chain| chain.len()).ok(), Some(1));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_scope_is_reported_as_scope_not_found() {
        let result = resolver(Arc::new(hierarchy()))
            .ancestors_of(&scope(Scope::school("S404")))
            .await;

        assert!(matches!(result, Err(AppError::ScopeNotFound(_))));
    }

    #[tokio::test]
    async fn dangling_parent_is_internal_error() {
        let directory = FakeDirectory::default().with(
            scope(Scope::school("S1")),
            Some(scope(Scope::district("D404"))),
        );
        let result = resolver(Arc::new(directory))
            .ancestors_of(&scope(Scope::school("S1")))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn invalid_parent_type_is_rejected() {
        let directory = FakeDirectory::default()
            .with(
                scope(Scope::school("S1")),
                Some(scope(Scope::cooperative("C1"))),
            )
            .with(scope(Scope::cooperative("C1")), None);
        let result = resolver(Arc::new(directory))
            .ancestors_of(&scope(Scope::school("S1")))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn cyclic_directory_is_bounded() {
        let d1 = scope(Scope::district("D1"));
        let d2 = scope(Scope::district("D2"));
        let directory = Arc::new(
            FakeDirectory::default()
                .with(d1.clone(), Some(d2.clone()))
                .with(d2, Some(d1.clone())),
        );
        let result = resolver(directory.clone()).ancestors_of(&d1).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(directory.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_directory_times_out() {
        let mut directory = hierarchy();
        directory.delay = Some(Duration::from_secs(5));
        let result = resolver(Arc::new(directory))
            .ancestors_of(&scope(Scope::school("S9")))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
