use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;

pub mod auth;
pub mod documents;
pub mod error;
pub mod health;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        documents::list_document_versions,
        documents::record_document_version,
        documents::get_document_version,
        documents::get_document_version_diff,
    ),
    components(schemas(
        health::HealthResponse,
        error::ErrorResponse,
        documents::VersionSummary,
        documents::VersionListResponse,
        documents::RecordVersionRequest,
        documents::RecordVersionResponse,
        documents::VersionContentPayload,
        documents::VersionContentResponse,
        documents::VersionDiffSideResponse,
        documents::VersionDiffPayload,
        documents::VersionDiffResponse,
        crate::application::dto::diff::ChangeKind,
        crate::application::dto::diff::ChangeEntry,
        crate::application::dto::diff::DiffStats,
    )),
    tags(
        (name = "Documents", description = "Document version history"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Full HTTP surface: health, `/api` routes, API docs and middleware.
pub fn router(ctx: AppContext) -> Router {
    let cors = cors_layer(ctx.cfg.frontend_url.as_deref());
    Router::new()
        .merge(health::routes())
        .nest("/api", documents::routes(ctx))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    match frontend_url.and_then(|url| HeaderValue::from_str(url).ok()) {
        Some(origin) => base.allow_origin(origin),
        None => base.allow_origin(Any),
    }
}
