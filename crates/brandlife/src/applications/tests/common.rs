use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, BudgetBracket, RevenueBracket,
    StatusStats, Timeline,
};
use crate::applications::query::{ApplicationFilter, PageWindow, RecordPage};
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::{
    application_router, ApplicationService, ContactRequest, InMemoryApplicationRepository,
};
use crate::config::ListingConfig;

pub(super) fn detailed_request(name: &str, email: &str) -> ContactRequest {
    ContactRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        company: Some("Beauty Brand Co".to_string()),
        revenue: Some("$50K-100K/month".to_string()),
        challenges: Some("Rising acquisition costs on paid social".to_string()),
        goals: Some("Decrease CAC by 25%, scale to $300k/mo".to_string()),
        timeline: Some("ASAP (Within 30 days)".to_string()),
        budget: Some("$15K-30K/month".to_string()),
        ..ContactRequest::default()
    }
}

pub(super) fn quick_request(full_name: &str, email: &str) -> ContactRequest {
    ContactRequest {
        full_name: Some(full_name.to_string()),
        email: Some(email.to_string()),
        phone: Some("+1 (555) 234-5678".to_string()),
        instagram: Some("@fitgearofficial".to_string()),
        tiktok: Some("@fitgear".to_string()),
        website: Some("https://fitgear.io".to_string()),
        monthly_revenue: Some("10k-50k".to_string()),
        monthly_budget: Some("2.5k-5k".to_string()),
        help_needed: Some(vec![
            "UGC / Creators".to_string(),
            "CRO / Funnels".to_string(),
        ]),
        goals: Some("100 qualified leads/mo".to_string()),
        ..ContactRequest::default()
    }
}

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Stored record submitted `minutes` after [`base_time`].
pub(super) fn record(
    name: &str,
    email: &str,
    status: ApplicationStatus,
    minutes: i64,
) -> ApplicationRecord {
    let submitted_at = base_time() + Duration::minutes(minutes);
    ApplicationRecord {
        id: ApplicationId::generate(),
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        instagram: None,
        tiktok: None,
        website: None,
        company: format!("{name} Studio"),
        revenue: RevenueBracket::From10KTo50K,
        challenges: "Content system".to_string(),
        goals: "Grow qualified leads".to_string(),
        timeline: Timeline::OneToThreeMonths,
        budget: BudgetBracket::From5KTo15K,
        status,
        submitted_at,
        reviewed_at: None,
        notes: None,
        created_at: submitted_at,
        updated_at: submitted_at,
    }
}

/// Inserts `count` pending records, one minute apart, named `Lead 00`, `Lead 01`, ...
pub(super) fn seed_leads<R: ApplicationRepository + ?Sized>(repository: &R, count: usize) {
    for index in 0..count {
        repository
            .insert(record(
                &format!("Lead {index:02}"),
                &format!("lead{index:02}@example.com"),
                ApplicationStatus::Pending,
                index as i64,
            ))
            .expect("seed insert");
    }
}

pub(super) fn build_service() -> (
    ApplicationService<InMemoryApplicationRepository>,
    Arc<InMemoryApplicationRepository>,
) {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = ApplicationService::new(repository.clone(), ListingConfig::default());
    (service, repository)
}

pub(super) fn router_with_repository(repository: Arc<InMemoryApplicationRepository>) -> axum::Router {
    application_router(Arc::new(ApplicationService::new(
        repository,
        ListingConfig::default(),
    )))
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: &ApplicationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find(
        &self,
        _filter: &ApplicationFilter,
        _window: Option<PageWindow>,
    ) -> Result<RecordPage, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn status_stats(&self) -> Result<StatusStats, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
