use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::export::EXPORT_FILE_NAME;
use super::query::ListApplicationsParams;
use super::repository::{ApplicationRepository, RepositoryError};
use super::service::{ApplicationService, ApplicationServiceError, UpdateApplicationRequest};
use super::submission::ContactRequest;

/// Router builder exposing the intake and admin endpoints.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/contact", post(submit_handler::<R>))
        .route(
            "/api/applications",
            get(list_handler::<R>).patch(update_handler::<R>),
        )
        .route("/api/applications/export", get(export_handler::<R>))
        .route("/api/applications/:application_id", get(detail_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };
    match service.submit(request) {
        Ok(record) => {
            let payload = json!({
                "message": "Application submitted successfully",
                "applicationId": record.id,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(ApplicationServiceError::Repository(RepositoryError::Conflict)) => error_response(
            StatusCode::CONFLICT,
            "An application with this email already exists",
        ),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Query(params): Query<ListApplicationsParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list(&params) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    body: Result<Json<UpdateApplicationRequest>, JsonRejection>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };
    match service.update_status(request) {
        Ok(application) => {
            let payload = json!({
                "message": "Application updated successfully",
                "application": application,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&application_id) {
        Ok(application) => {
            (StatusCode::OK, Json(json!({ "application": application }))).into_response()
        }
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Query(params): Query<ListApplicationsParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let filter = match params.filter() {
        Ok(filter) => filter,
        Err(err) => return service_error_response(err.into()),
    };

    let mut body = Vec::new();
    match service.export_csv(&filter, &mut body) {
        Ok(_) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.as_ref().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(other) => service_error_response(other),
    }
}

fn service_error_response(err: ApplicationServiceError) -> Response {
    match err {
        ApplicationServiceError::Validation(err) => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        ApplicationServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "Application not found")
        }
        other => {
            error!(error = %other, "application request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn rejected_body(rejection: JsonRejection) -> Response {
    warn!(reason = %rejection.body_text(), "rejected request body");
    error_response(StatusCode::BAD_REQUEST, "Invalid request body")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
