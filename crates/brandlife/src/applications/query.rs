use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, ApplicationStatus, StatusStats};
use super::validation::ValidationError;
use crate::config::ListingConfig;

/// Raw query string of `GET /api/applications`. Parsed by hand so malformed
/// values become descriptive 400s instead of extractor rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListApplicationsParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListApplicationsParams {
    pub fn filter(&self) -> Result<ApplicationFilter, ValidationError> {
        ApplicationFilter::parse(self.status.as_deref(), self.search.as_deref())
    }

    pub fn page_request(&self, listing: &ListingConfig) -> Result<PageRequest, ValidationError> {
        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive("limit", self.limit.as_deref())?
            .unwrap_or(listing.default_limit)
            .min(listing.max_limit);
        Ok(PageRequest { page, limit })
    }
}

fn parse_positive(name: &str, raw: Option<&str>) -> Result<Option<u32>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(ValidationError::InvalidQuery(format!(
            "{name} must be a positive integer"
        ))),
    }
}

/// Status match AND'ed with a case-insensitive substring search over
/// name, email and company.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    search: Option<String>,
}

impl ApplicationFilter {
    pub fn new(status: Option<ApplicationStatus>, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        Self { status, search }
    }

    /// Accepts `all` (or nothing) as "every status".
    pub fn parse(status: Option<&str>, search: Option<&str>) -> Result<Self, ValidationError> {
        let status = match status.map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(ApplicationStatus::parse(raw).ok_or_else(|| {
                ValidationError::InvalidQuery(format!(
                    "status must be one of all, pending, reviewed, approved, rejected (got '{raw}')"
                ))
            })?),
        };
        Ok(Self::new(status, search))
    }

    /// Lowercased search term, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        match &self.search {
            None => true,
            Some(term) => [&record.name, &record.email, &record.company]
                .into_iter()
                .any(|field| field.to_lowercase().contains(term.as_str())),
        }
    }
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: u64::from(self.page - 1) * u64::from(self.limit),
            limit: u64::from(self.limit),
        }
    }
}

/// Skip/take bounds handed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

/// One page of matching records plus the size of the whole match set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<ApplicationRecord>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.limit));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages,
            has_next: u64::from(request.page) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// Response body of `GET /api/applications`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListing {
    pub applications: Vec<ApplicationRecord>,
    pub pagination: Pagination,
    pub status_stats: StatusStats,
}

/// Listing order: newest submission first, id as tie-breaker.
pub fn sort_for_listing(records: &mut [ApplicationRecord]) {
    records.sort_by(|left, right| {
        right
            .submitted_at
            .cmp(&left.submitted_at)
            .then_with(|| left.id.cmp(&right.id))
    });
}
