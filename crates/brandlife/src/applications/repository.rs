use super::domain::{ApplicationId, ApplicationRecord, StatusStats};
use super::query::{ApplicationFilter, PageWindow, RecordPage};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ApplicationRepository: Send + Sync {
    /// Inserts a new document. Implementations enforce email uniqueness as
    /// part of the write itself and report a duplicate as [`RepositoryError::Conflict`].
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;

    /// Persists the review fields (status, notes, reviewedAt, updatedAt) of an
    /// existing document.
    fn update(&self, record: &ApplicationRecord) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;

    /// Matching documents in listing order. `None` returns the whole match set.
    fn find(
        &self,
        filter: &ApplicationFilter,
        window: Option<PageWindow>,
    ) -> Result<RecordPage, RepositoryError>;

    /// Per-status counts over the whole collection.
    fn status_stats(&self) -> Result<StatusStats, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
