//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_organization_directory;
mod in_memory_subject_repository;
mod postgres_audit_repository;
mod postgres_organization_directory;
mod postgres_subject_repository;

pub use in_memory_organization_directory::InMemoryOrganizationDirectory;
pub use in_memory_subject_repository::InMemorySubjectRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_organization_directory::PostgresOrganizationDirectory;
pub use postgres_subject_repository::PostgresSubjectRepository;
