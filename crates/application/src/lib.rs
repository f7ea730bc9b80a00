//! Application services and ports.

#![forbid(unsafe_code)]

mod ancestry_resolver;
mod authorization_ports;
mod authorization_service;
mod subject_service;

pub use ancestry_resolver::AncestryResolver;
pub use authorization_ports::{
    AuditEvent, AuditRepository, DirectoryEntry, OrganizationDirectory, SubjectRepository,
};
pub use authorization_service::{AuthorizationConfig, AuthorizationService};
pub use subject_service::{SubjectService, SubjectSnapshot};
