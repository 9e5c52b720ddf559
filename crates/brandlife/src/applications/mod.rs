//! Application intake, admin listing, review updates and CSV export.
//!
//! Requests flow router → service → repository. The service owns validation
//! and timestamps; repositories only persist, filter and count.

pub mod domain;
pub mod export;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BudgetBracket, NewApplication,
    RevenueBracket, StatusStats, Timeline,
};
pub use export::{to_csv_bytes, write_csv, EXPORT_FILE_NAME};
pub use query::{
    ApplicationFilter, ApplicationListing, ListApplicationsParams, PageRequest, PageWindow,
    Pagination, RecordPage,
};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError, UpdateApplicationRequest};
pub use storage::{InMemoryApplicationRepository, SqliteApplicationRepository};
pub use submission::{ContactRequest, FormVariant};
pub use validation::ValidationError;
