use std::sync::Arc;

use bidgate_application::{AuthorizationService, SubjectService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub subject_service: SubjectService,
    pub internal_api_token: Arc<str>,
}
