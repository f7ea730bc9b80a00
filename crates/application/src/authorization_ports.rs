use async_trait::async_trait;
use bidgate_core::AppResult;
use bidgate_domain::{AuditAction, AuthorizationSubject, Scope};

/// One organization directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The scope as the directory knows it, including its display name.
    pub scope: Scope,
    /// Direct parent. `None` places the scope directly under the system root.
    pub parent: Option<Scope>,
}

/// Port answering parent lookups for organizational scopes.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Finds one scope. Returns `None` when the directory does not know it.
    async fn find_scope(&self, scope: &Scope) -> AppResult<Option<DirectoryEntry>>;
}

/// Port loading authorization snapshots for principals.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Loads roles, bid roles and managed bids of a principal.
    ///
    /// A principal without any grant yields an empty subject, not an error.
    async fn load_subject(&self, principal: &str) -> AppResult<AuthorizationSubject>;
}

/// Immutable audit event payload emitted by application services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Principal whose check produced the event.
    pub subject: String,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Port for persisting append-only audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
