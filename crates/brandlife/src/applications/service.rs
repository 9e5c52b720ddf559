use std::io::Write;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{timestamp_now, ApplicationId, ApplicationRecord, ApplicationStatus};
use super::export::write_csv;
use super::query::{ApplicationFilter, ApplicationListing, ListApplicationsParams, Pagination};
use super::repository::{ApplicationRepository, RepositoryError};
use super::submission::ContactRequest;
use super::validation::{normalize_text, validate_record, ValidationError};
use crate::config::ListingConfig;

/// Body accepted by `PATCH /api/applications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateApplicationRequest {
    #[serde(default, deserialize_with = "scalar_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Non-string JSON values are kept as their JSON text so they fail the id or
/// status check instead of the body decode.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    }))
}

/// Service composing the schema checks with the repository.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    listing: ListingConfig,
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>, listing: ListingConfig) -> Self {
        Self {
            repository,
            listing,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn listing(&self) -> ListingConfig {
        self.listing
    }

    /// Validate and store a new application with `status=pending`.
    pub fn submit(
        &self,
        request: ContactRequest,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let variant = request.variant();
        let draft = request.into_new_application()?;
        let record = draft.into_record(ApplicationId::generate(), timestamp_now());
        validate_record(&record)?;

        match self.repository.insert(record) {
            Ok(stored) => {
                info!(application_id = %stored.id, ?variant, "new application submitted");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                warn!("rejected application with an already registered email");
                Err(RepositoryError::Conflict.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// One page of applications plus per-status totals for the dashboard.
    pub fn list(
        &self,
        params: &ListApplicationsParams,
    ) -> Result<ApplicationListing, ApplicationServiceError> {
        let filter = params.filter()?;
        let request = params.page_request(&self.listing)?;

        let page = self.repository.find(&filter, Some(request.window()))?;
        let status_stats = self.repository.status_stats()?;

        Ok(ApplicationListing {
            applications: page.records,
            pagination: Pagination::new(request, page.total),
            status_stats,
        })
    }

    /// Move an application to a new status, stamping `reviewedAt`.
    ///
    /// Every input check runs before the store is read, so a rejected request
    /// never modifies the record.
    pub fn update_status(
        &self,
        request: UpdateApplicationRequest,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let (Some(raw_id), Some(raw_status)) = (
            request.id.filter(|id| !id.trim().is_empty()),
            request.status.filter(|status| !status.trim().is_empty()),
        ) else {
            return Err(ValidationError::MissingIdOrStatus.into());
        };

        let status = ApplicationStatus::parse(&raw_status).ok_or(ValidationError::InvalidStatus)?;
        let id = ApplicationId::parse(&raw_id).ok_or(ValidationError::InvalidId)?;

        let mut record = self
            .repository
            .fetch(&id)?
            .ok_or(RepositoryError::NotFound)?;

        let now = timestamp_now();
        record.status = status;
        record.reviewed_at = Some(now);
        record.updated_at = now;
        if request.notes.is_some() {
            record.notes = normalize_text(request.notes);
        }
        validate_record(&record)?;

        self.repository.update(&record)?;
        info!(application_id = %record.id, status = status.label(), "application status updated");
        Ok(record)
    }

    /// Fetch a single application by identifier.
    pub fn get(&self, raw_id: &str) -> Result<ApplicationRecord, ApplicationServiceError> {
        let id = ApplicationId::parse(raw_id).ok_or(ValidationError::InvalidId)?;
        let record = self
            .repository
            .fetch(&id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Every application matching `filter`, in listing order.
    pub fn matching(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRecord>, ApplicationServiceError> {
        Ok(self.repository.find(filter, None)?.records)
    }

    /// Writes the CSV export of every application matching `filter`.
    pub fn export_csv<W: Write>(
        &self,
        filter: &ApplicationFilter,
        writer: W,
    ) -> Result<usize, ApplicationServiceError> {
        let records = self.matching(filter)?;
        write_csv(&records, writer)?;
        Ok(records.len())
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
}
