use std::sync::Arc;

use bidgate_core::{AppResult, NonEmptyString};
use bidgate_domain::AuthorizationSubject;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::SubjectRepository;

/// Authorization subject captured at a point in time.
///
/// The snapshot is never refreshed in place; callers decide when to load a new one.
#[derive(Debug, Clone)]
pub struct SubjectSnapshot {
    /// Loaded roles, bid roles and managed bids.
    pub subject: AuthorizationSubject,
    /// When the snapshot was loaded.
    pub captured_at: DateTime<Utc>,
}

/// Application service loading subject snapshots.
#[derive(Clone)]
pub struct SubjectService {
    repository: Arc<dyn SubjectRepository>,
}

impl SubjectService {
    /// Creates a new subject service.
    #[must_use]
    pub fn new(repository: Arc<dyn SubjectRepository>) -> Self {
        Self { repository }
    }

    /// Loads a fresh snapshot for a principal.
    pub async fn snapshot(&self, principal: &str) -> AppResult<SubjectSnapshot> {
        let principal = NonEmptyString::new(principal.trim())?;
        let subject = self.repository.load_subject(principal.as_str()).await?;

        debug!(
            principal = subject.principal(),
            roles = subject.roles().len(),
            bid_roles = subject.bid_roles().len(),
            managed_bids = subject.managed_bids().len(),
            "loaded authorization subject"
        );

        Ok(SubjectSnapshot {
            subject,
            captured_at: Utc::now(),
        })
    }
}
