use std::sync::Arc;

use bidgate_application::{AuthorizationService, SubjectService};
use bidgate_infrastructure::{
    PostgresAuditRepository, PostgresOrganizationDirectory, PostgresSubjectRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let directory = Arc::new(PostgresOrganizationDirectory::new(pool.clone()));
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));
    let subject_repository = Arc::new(PostgresSubjectRepository::new(pool));

    AppState {
        authorization_service: AuthorizationService::new(
            directory,
            audit_repository,
            config.authorization,
        ),
        subject_service: SubjectService::new(subject_repository),
        internal_api_token: Arc::from(config.internal_api_token.as_str()),
    }
}
