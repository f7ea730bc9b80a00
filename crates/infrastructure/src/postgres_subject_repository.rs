use std::str::FromStr;

use async_trait::async_trait;
use bidgate_application::SubjectRepository;
use bidgate_core::{AppError, AppResult};
use bidgate_domain::{AuthorizationSubject, BidId, BidRole, BidRoleType, Role, RoleType};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::postgres_organization_directory::decode_scope;

/// PostgreSQL-backed repository for authorization snapshots.
#[derive(Clone)]
pub struct PostgresSubjectRepository {
    pool: PgPool,
}

impl PostgresSubjectRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_type: String,
    scope_type: String,
    scope_id: String,
    permissions: Vec<String>,
}

#[derive(Debug, FromRow)]
struct ManagedBidRow {
    bid_id: String,
}

// Unknown role types fail the whole load rather than silently dropping the grant.
fn decode_role_type<T: FromStr<Err = AppError>>(principal: &str, value: &str) -> AppResult<T> {
    T::from_str(value).map_err(|error| {
        AppError::Internal(format!(
            "failed to decode role type '{value}' for principal '{principal}': {error}"
        ))
    })
}

#[async_trait]
impl SubjectRepository for PostgresSubjectRepository {
    async fn load_subject(&self, principal: &str) -> AppResult<AuthorizationSubject> {
        let role_rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT role_type, scope_type, scope_id, permissions
            FROM subject_roles
            WHERE principal = $1
            ORDER BY id
            "#,
        )
        .bind(principal)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load roles: {error}")))?;

        let bid_role_rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT role_type, scope_type, scope_id, permissions
            FROM subject_bid_roles
            WHERE principal = $1
            ORDER BY id
            "#,
        )
        .bind(principal)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load bid roles: {error}")))?;

        let managed_bid_rows = sqlx::query_as::<_, ManagedBidRow>(
            r#"
            SELECT bid_id
            FROM bid_managers
            WHERE principal = $1
            "#,
        )
        .bind(principal)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load managed bids: {error}")))?;

        let mut subject = AuthorizationSubject::new(principal);

        for row in role_rows {
            subject = subject.with_role(Role::new(
                decode_role_type::<RoleType>(principal, row.role_type.as_str())?,
                decode_scope(row.scope_type.as_str(), row.scope_id.as_str())?,
                row.permissions.into_iter().collect(),
            ));
        }

        for row in bid_role_rows {
            subject = subject.with_bid_role(BidRole::new(
                decode_role_type::<BidRoleType>(principal, row.role_type.as_str())?,
                decode_scope(row.scope_type.as_str(), row.scope_id.as_str())?,
                row.permissions.into_iter().collect(),
            ));
        }

        for row in managed_bid_rows {
            let bid_id = BidId::new(row.bid_id).map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode managed bid for principal '{principal}': {error}"
                ))
            })?;
            subject = subject.with_managed_bid(bid_id);
        }

        debug!(
            principal,
            roles = subject.roles().len(),
            bid_roles = subject.bid_roles().len(),
            managed_bids = subject.managed_bids().len(),
            "loaded authorization subject"
        );

        Ok(subject)
    }
}
