use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by authorization use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a check named a scope the organization directory does not know.
    AuthorizationScopeUnresolved,
    /// Emitted when the organization directory failed or timed out during a check.
    AuthorizationDirectoryUnavailable,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationScopeUnresolved => "authorization.scope_unresolved",
            Self::AuthorizationDirectoryUnavailable => "authorization.directory_unavailable",
        }
    }
}
