use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Extension;
use axum::Json;
use brandlife::applications::{application_router, ApplicationRepository, ApplicationService};
use serde_json::json;
use std::sync::Arc;

/// HTML page compiled into the binary.
struct StaticPage {
    file_name: &'static str,
    body: &'static str,
}

const LANDING_PAGE: StaticPage = StaticPage {
    file_name: "index.html",
    body: include_str!("../assets/index.html"),
};

const ADMIN_PAGE: StaticPage = StaticPage {
    file_name: "admin.html",
    body: include_str!("../assets/admin.html"),
};

pub(crate) fn with_application_routes<R>(service: Arc<ApplicationService<R>>) -> axum::Router
where
    R: ApplicationRepository + 'static,
{
    application_router(service)
        .route("/", get(landing_page))
        .route("/admin", get(admin_page))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn landing_page() -> Response {
    page_response(&LANDING_PAGE)
}

pub(crate) async fn admin_page() -> Response {
    page_response(&ADMIN_PAGE)
}

fn page_response(page: &StaticPage) -> Response {
    let content_type = mime_guess::from_path(page.file_name).first_or_text_plain();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        page.body,
    )
        .into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
