use std::str::FromStr;

use async_trait::async_trait;
use bidgate_application::{DirectoryEntry, OrganizationDirectory};
use bidgate_core::{AppError, AppResult};
use bidgate_domain::{Scope, ScopeType};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed organization directory.
#[derive(Clone)]
pub struct PostgresOrganizationDirectory {
    pool: PgPool,
}

impl PostgresOrganizationDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScopeRow {
    scope_type: String,
    scope_id: String,
    name: Option<String>,
    parent_type: Option<String>,
    parent_id: Option<String>,
}

pub(crate) fn decode_scope(scope_type: &str, scope_id: &str) -> AppResult<Scope> {
    ScopeType::from_str(scope_type)
        .and_then(|scope_type| Scope::new(scope_type, scope_id))
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to decode scope '{scope_type}:{scope_id}': {error}"
            ))
        })
}

impl ScopeRow {
    fn into_entry(self) -> AppResult<DirectoryEntry> {
        let mut scope = decode_scope(self.scope_type.as_str(), self.scope_id.as_str())?;
        if let Some(name) = self.name {
            scope = scope.with_name(name);
        }

        let parent = match (self.parent_type, self.parent_id) {
            (Some(parent_type), Some(parent_id)) => {
                Some(decode_scope(parent_type.as_str(), parent_id.as_str())?)
            }
            (None, None) => None,
            _ => {
                return Err(AppError::Internal(format!(
                    "scope '{scope}' has a partial parent reference"
                )));
            }
        };

        Ok(DirectoryEntry { scope, parent })
    }
}

#[async_trait]
impl OrganizationDirectory for PostgresOrganizationDirectory {
    async fn find_scope(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>> {
        if scope.is_system() {
            return Ok(Some(DirectoryEntry {
                scope: Scope::system(),
                parent: None,
            }));
        }

        let row = sqlx::query_as::<_, ScopeRow>(
            r#"
            SELECT scope_type, scope_id, name, parent_type, parent_id
            FROM organization_scopes
            WHERE scope_type = $1
                AND scope_id = $2
            "#,
        )
        .bind(scope.scope_type().as_str())
        .bind(scope.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up scope '{scope}': {error}"))
        })?;

        row.map(ScopeRow::into_entry).transpose()
    }
}
