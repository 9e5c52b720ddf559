use super::common::*;
use crate::applications::domain::{ApplicationStatus, BudgetBracket, RevenueBracket, Timeline};
use crate::applications::query::ListApplicationsParams;
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::applications::{
    ApplicationService, ApplicationServiceError, UpdateApplicationRequest, ValidationError,
};
use crate::config::ListingConfig;
use chrono::{Duration, Utc};
use std::sync::Arc;

fn list(status: Option<&str>, search: Option<&str>, page: u32, limit: u32) -> ListApplicationsParams {
    ListApplicationsParams {
        status: status.map(str::to_string),
        search: search.map(str::to_string),
        page: Some(page.to_string()),
        limit: Some(limit.to_string()),
    }
}

fn update(id: &str, status: &str, notes: Option<&str>) -> UpdateApplicationRequest {
    UpdateApplicationRequest {
        id: Some(id.to_string()),
        status: Some(status.to_string()),
        notes: notes.map(str::to_string),
    }
}

#[test]
fn submit_persists_pending_record_stamped_now() {
    let (service, repository) = build_service();
    let before = Utc::now();

    let stored = service
        .submit(detailed_request("Sarah Johnson", "Sarah.J@BeautyBrand.com"))
        .expect("submission accepted");

    assert_eq!(stored.status, ApplicationStatus::Pending);
    assert_eq!(stored.email, "sarah.j@beautybrand.com");
    assert!(stored.reviewed_at.is_none());
    assert!(stored.submitted_at >= before - Duration::milliseconds(1));
    assert!(stored.submitted_at <= Utc::now());
    assert_eq!(stored.created_at, stored.submitted_at);

    let fetched = repository
        .fetch(&stored.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(fetched, stored);
}

#[test]
fn submit_rejects_duplicate_email_regardless_of_case() {
    let (service, repository) = build_service();
    service
        .submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com"))
        .expect("first submission accepted");

    match service.submit(detailed_request("Sarah J", "  SARAH@beautybrand.com ")) {
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(repository.len(), 1);
}

#[test]
fn submit_rejects_malformed_email_before_persisting() {
    let (service, repository) = build_service();

    match service.submit(detailed_request("Mike Chen", "not-an-email")) {
        Err(ApplicationServiceError::Validation(ValidationError::InvalidEmailFormat)) => {}
        other => panic!("expected invalid email, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn submit_applies_schema_email_pattern() {
    let (service, repository) = build_service();

    match service.submit(detailed_request("Mike Chen", "mike@fitgear.c")) {
        Err(ApplicationServiceError::Validation(ValidationError::Field(message))) => {
            assert_eq!(message, "Please enter a valid email");
        }
        other => panic!("expected schema email failure, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn quick_form_is_mapped_onto_document_fields() {
    let (service, _repository) = build_service();

    let stored = service
        .submit(quick_request("Mike Chen", "mike@fitgear.io"))
        .expect("quick form accepted");

    assert_eq!(stored.name, "Mike Chen");
    assert_eq!(stored.company, "https://fitgear.io");
    assert_eq!(stored.revenue, RevenueBracket::From10KTo50K);
    assert_eq!(stored.budget, BudgetBracket::From5KTo15K);
    assert_eq!(stored.timeline, Timeline::OneToThreeMonths);
    assert_eq!(
        stored.challenges,
        "Help needed with: UGC / Creators, CRO / Funnels"
    );
    assert_eq!(stored.phone.as_deref(), Some("+1 (555) 234-5678"));
}

#[test]
fn quick_form_defaults_fill_missing_business_fields() {
    let (service, _repository) = build_service();
    let mut request = quick_request("Emily Rodriguez", "emily@localcafe.com");
    request.website = None;
    request.help_needed = None;
    request.goals = Some("   ".to_string());
    request.monthly_revenue = Some("prefer-not-to-say".to_string());
    request.monthly_budget = None;

    let stored = service.submit(request).expect("quick form accepted");

    assert_eq!(stored.company, "Emily Rodriguez's Business");
    assert_eq!(stored.challenges, "General business growth");
    assert_eq!(stored.goals, "Growth and scaling objectives");
    assert_eq!(stored.revenue, RevenueBracket::Under10K);
    assert_eq!(stored.budget, BudgetBracket::Under5K);
}

#[test]
fn quick_form_requires_phone() {
    let (service, _repository) = build_service();
    let mut request = quick_request("David Park", "david@techgadgets.co");
    request.phone = Some(" ".to_string());

    assert!(matches!(
        service.submit(request),
        Err(ApplicationServiceError::Validation(ValidationError::MissingFields))
    ));
}

#[test]
fn detailed_form_rejects_unknown_bracket() {
    let (service, repository) = build_service();
    let mut request = detailed_request("Jessica Martinez", "jess@organicskincare.com");
    request.budget = Some("$1M/month".to_string());

    match service.submit(request) {
        Err(ApplicationServiceError::Validation(ValidationError::InvalidChoice {
            field, ..
        })) => assert_eq!(field, "budget"),
        other => panic!("expected invalid choice, got {other:?}"),
    }
    assert!(repository.is_empty());
}

#[test]
fn list_filters_by_status_and_reports_full_collection_stats() {
    let (service, repository) = build_service();
    repository
        .insert(record("Ava", "ava@example.com", ApplicationStatus::Approved, 1))
        .expect("insert");
    repository
        .insert(record("Ben", "ben@example.com", ApplicationStatus::Pending, 2))
        .expect("insert");
    repository
        .insert(record("Cal", "cal@example.com", ApplicationStatus::Approved, 3))
        .expect("insert");

    let approved = service
        .list(&list(Some("approved"), None, 1, 10))
        .expect("listing succeeds");
    assert_eq!(approved.applications.len(), 2);
    assert!(approved
        .applications
        .iter()
        .all(|application| application.status == ApplicationStatus::Approved));
    assert_eq!(approved.pagination.total, 2);
    assert_eq!(approved.status_stats.approved, 2);
    assert_eq!(approved.status_stats.pending, 1);

    let everything = service
        .list(&list(Some("all"), None, 1, 10))
        .expect("listing succeeds");
    assert_eq!(everything.applications.len(), 3);
    let omitted = service
        .list(&ListApplicationsParams::default())
        .expect("listing succeeds");
    assert_eq!(omitted.applications.len(), 3);
    assert_eq!(omitted.applications[0].name, "Cal");
}

#[test]
fn list_searches_name_email_and_company_case_insensitively() {
    let (service, repository) = build_service();
    repository
        .insert(record("Sarah Johnson", "sarah@beauty.com", ApplicationStatus::Pending, 1))
        .expect("insert");
    repository
        .insert(record("Mike Chen", "mike@fitgear.io", ApplicationStatus::Pending, 2))
        .expect("insert");

    let by_name = service
        .list(&list(None, Some("JOHN"), 1, 10))
        .expect("listing succeeds");
    assert_eq!(by_name.applications.len(), 1);
    assert_eq!(by_name.applications[0].name, "Sarah Johnson");

    let by_email = service
        .list(&list(None, Some("fitgear"), 1, 10))
        .expect("listing succeeds");
    assert_eq!(by_email.applications.len(), 1);

    let by_company = service
        .list(&list(None, Some("chen studio"), 1, 10))
        .expect("listing succeeds");
    assert_eq!(by_company.applications.len(), 1);

    let none = service
        .list(&list(None, Some("zzz-no-match"), 1, 10))
        .expect("listing succeeds");
    assert!(none.applications.is_empty());
    assert_eq!(none.pagination.total, 0);
    assert_eq!(none.status_stats.pending, 2);
}

#[test]
fn list_paginates_twenty_five_records() {
    let (service, repository) = build_service();
    seed_leads(repository.as_ref(), 25);

    let first = service.list(&list(None, None, 1, 10)).expect("page 1");
    assert_eq!(first.applications.len(), 10);
    assert!(first.pagination.has_next);
    assert!(!first.pagination.has_prev);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.applications[0].name, "Lead 24");

    let third = service.list(&list(None, None, 3, 10)).expect("page 3");
    assert_eq!(third.applications.len(), 5);
    assert!(!third.pagination.has_next);
    assert!(third.pagination.has_prev);
    assert_eq!(third.applications[4].name, "Lead 00");

    let beyond = service.list(&list(None, None, 9, 10)).expect("page 9");
    assert!(beyond.applications.is_empty());
    assert_eq!(beyond.pagination.total, 25);
    assert!(!beyond.pagination.has_next);
    assert!(beyond.pagination.has_prev);
}

#[test]
fn list_rejects_unknown_status_filter() {
    let (service, _repository) = build_service();
    assert!(matches!(
        service.list(&list(Some("archived"), None, 1, 10)),
        Err(ApplicationServiceError::Validation(ValidationError::InvalidQuery(_)))
    ));
}

#[test]
fn update_sets_status_review_stamp_and_notes() {
    let (service, _repository) = build_service();
    let stored = service
        .submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com"))
        .expect("submitted");

    let updated = service
        .update_status(update(
            stored.id.as_str(),
            "approved",
            Some("  Strong fit for paid ads retainer "),
        ))
        .expect("update succeeds");

    assert_eq!(updated.status, ApplicationStatus::Approved);
    assert!(updated.reviewed_at.is_some());
    assert_eq!(updated.notes.as_deref(), Some("Strong fit for paid ads retainer"));

    let listing = service
        .list(&list(Some("approved"), None, 1, 10))
        .expect("listing succeeds");
    assert_eq!(listing.applications.len(), 1);
    assert_eq!(listing.applications[0].id, stored.id);
    assert_eq!(listing.applications[0].reviewed_at, updated.reviewed_at);
    assert_eq!(listing.status_stats.approved, 1);
    assert_eq!(listing.status_stats.pending, 0);
}

#[test]
fn update_without_notes_keeps_existing_notes() {
    let (service, _repository) = build_service();
    let stored = service
        .submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com"))
        .expect("submitted");
    service
        .update_status(update(stored.id.as_str(), "reviewed", Some("call booked")))
        .expect("first update");

    let updated = service
        .update_status(update(stored.id.as_str(), "rejected", None))
        .expect("second update");
    assert_eq!(updated.status, ApplicationStatus::Rejected);
    assert_eq!(updated.notes.as_deref(), Some("call booked"));
}

#[test]
fn update_rejects_invalid_status_and_leaves_record_unchanged() {
    let (service, repository) = build_service();
    let stored = service
        .submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com"))
        .expect("submitted");

    match service.update_status(update(stored.id.as_str(), "archived", Some("note"))) {
        Err(ApplicationServiceError::Validation(ValidationError::InvalidStatus)) => {}
        other => panic!("expected invalid status, got {other:?}"),
    }

    let unchanged = repository
        .fetch(&stored.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(unchanged, stored);
}

#[test]
fn update_requires_id_and_status() {
    let (service, _repository) = build_service();
    let request = UpdateApplicationRequest {
        id: None,
        status: Some("approved".to_string()),
        notes: None,
    };
    assert!(matches!(
        service.update_status(request),
        Err(ApplicationServiceError::Validation(ValidationError::MissingIdOrStatus))
    ));
}

#[test]
fn update_rejects_overlong_notes() {
    let (service, repository) = build_service();
    let stored = service
        .submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com"))
        .expect("submitted");
    let notes = "x".repeat(501);

    assert!(matches!(
        service.update_status(update(stored.id.as_str(), "reviewed", Some(&notes))),
        Err(ApplicationServiceError::Validation(ValidationError::Field(_)))
    ));
    let unchanged = repository
        .fetch(&stored.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(unchanged.status, ApplicationStatus::Pending);
}

#[test]
fn update_reports_unknown_application() {
    let (service, _repository) = build_service();
    let missing = crate::applications::ApplicationId::generate();

    match service.update_status(update(missing.as_str(), "approved", None)) {
        Err(ApplicationServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn get_rejects_malformed_identifier() {
    let (service, _repository) = build_service();
    assert!(matches!(
        service.get("not-a-uuid"),
        Err(ApplicationServiceError::Validation(ValidationError::InvalidId))
    ));
}

#[test]
fn store_failures_propagate_as_repository_errors() {
    let service = ApplicationService::new(Arc::new(UnavailableRepository), ListingConfig::default());

    assert!(matches!(
        service.submit(detailed_request("Sarah Johnson", "sarah@beautybrand.com")),
        Err(ApplicationServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
    assert!(matches!(
        service.list(&ListApplicationsParams::default()),
        Err(ApplicationServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
