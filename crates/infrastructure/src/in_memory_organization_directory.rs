use std::collections::HashMap;

use async_trait::async_trait;
use bidgate_application::{DirectoryEntry, OrganizationDirectory};
use bidgate_core::{AppError, AppResult};
use bidgate_domain::{Scope, ScopeType};
use tokio::sync::RwLock;

/// In-memory organization directory.
#[derive(Debug, Default)]
pub struct InMemoryOrganizationDirectory {
    entries: RwLock<HashMap<Scope, DirectoryEntry>>,
}

impl InMemoryOrganizationDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope under an already registered parent.
    ///
    /// `None` places a cooperative or district directly under the system root.
    /// Schools must name their district.
    pub async fn register(&self, scope: Scope, parent: Option<Scope>) -> AppResult<()> {
        if scope.is_system() {
            return Err(AppError::Validation(
                "the system scope is implicit and cannot be registered".to_owned(),
            ));
        }

        let parent = parent.filter(|value| !value.is_system());
        let parent_type = parent
            .as_ref()
            .map(Scope::scope_type)
            .unwrap_or(ScopeType::System);
        if !scope.scope_type().allows_parent(parent_type) {
            return Err(AppError::Validation(format!(
                "a {} cannot be placed under a {parent_type}",
                scope.scope_type()
            )));
        }

        let mut entries = self.entries.write().await;
        if let Some(parent) = parent.as_ref()
            && !entries.contains_key(parent)
        {
            return Err(AppError::NotFound(format!(
                "parent scope '{parent}' of '{scope}' is not registered"
            )));
        }

        if entries.contains_key(&scope) {
            return Err(AppError::Conflict(format!(
                "scope '{scope}' is already registered"
            )));
        }

        entries.insert(scope.clone(), DirectoryEntry { scope, parent });
        Ok(())
    }
}

#[async_trait]
impl OrganizationDirectory for InMemoryOrganizationDirectory {
    async fn find_scope(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>> {
        if scope.is_system() {
            return Ok(Some(DirectoryEntry {
                scope: Scope::system(),
                parent: None,
            }));
        }

        Ok(self.entries.read().await.get(scope).cloned())
    }
}
