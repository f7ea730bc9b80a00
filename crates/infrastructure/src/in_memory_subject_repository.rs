use std::collections::HashMap;

use async_trait::async_trait;
use bidgate_application::SubjectRepository;
use bidgate_core::AppResult;
use bidgate_domain::AuthorizationSubject;
use tokio::sync::RwLock;

/// In-memory subject repository keyed by principal.
#[derive(Debug, Default)]
pub struct InMemorySubjectRepository {
    subjects: RwLock<HashMap<String, AuthorizationSubject>>,
}

impl InMemorySubjectRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces the subject of its principal.
    pub async fn save_subject(&self, subject: AuthorizationSubject) {
        self.subjects
            .write()
            .await
            .insert(subject.principal().to_owned(), subject);
    }
}

#[async_trait]
impl SubjectRepository for InMemorySubjectRepository {
    async fn load_subject(&self, principal: &str) -> AppResult<AuthorizationSubject> {
        Ok(self
            .subjects
            .read()
            .await
            .get(principal)
            .cloned()
            .unwrap_or_else(|| AuthorizationSubject::new(principal)))
    }
}
