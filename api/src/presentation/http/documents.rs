use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::dto::diff::{ChangeEntry, DiffStats};
use crate::application::ports::document_version_repository::VersionRecord;
use crate::application::use_cases::documents::list_versions::ListVersions;
use crate::application::use_cases::documents::record_version::RecordVersion;
use crate::application::use_cases::documents::version_content::GetVersionContent;
use crate::application::use_cases::documents::version_diff::{VersionDiff, VersionDiffSide};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::error::ApiError;

pub const VERSIONS_NOT_FOUND: &str = "One or both versions not found";
pub const VERSION_NOT_FOUND: &str = "Version not found";

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version_number: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<String>,
    pub label: Option<String>,
    pub byte_size: i64,
}

fn version_summary_from(record: VersionRecord) -> VersionSummary {
    VersionSummary {
        version_number: record.version_number,
        created_at: record.created_at,
        created_by: record.created_by,
        label: record.label,
        byte_size: record.byte_size,
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionListResponse {
    pub success: bool,
    pub versions: Vec<VersionSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordVersionRequest {
    pub text: String,
    pub label: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordVersionResponse {
    pub success: bool,
    pub version: VersionSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionContentPayload {
    pub version_number: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<String>,
    pub text_length: usize,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionContentResponse {
    pub success: bool,
    pub version: VersionContentPayload,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiffSideResponse {
    pub version_number: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub created_by: Option<String>,
    pub text_length: usize,
}

fn version_diff_side_response_from(side: &VersionDiffSide) -> VersionDiffSideResponse {
    VersionDiffSideResponse {
        version_number: side.record.version_number,
        created_at: side.record.created_at,
        created_by: side.record.created_by.clone(),
        text_length: side.text_length(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionDiffPayload {
    pub v1: VersionDiffSideResponse,
    pub v2: VersionDiffSideResponse,
    pub changes: Vec<ChangeEntry>,
    pub stats: DiffStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionDiffResponse {
    pub success: bool,
    pub diff: VersionDiffPayload,
}

/// Reads a version number the way `parseInt(raw, 10)` does: leading
/// whitespace, an optional sign, then the longest run of decimal digits.
/// Anything else matches no version.
pub fn parse_version_param(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}/versions",
    tag = "Documents",
    params(("document_id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, body = VersionListResponse),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
        (status = 500, body = crate::presentation::http::error::ErrorResponse)
    )
)]
pub async fn list_document_versions(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(document_id): Path<String>,
) -> Result<Json<VersionListResponse>, ApiError> {
    auth::validate_bearer(&ctx.cfg, bearer)?;

    let version_service = ctx.version_service();
    let uc = ListVersions {
        versions: version_service.as_ref(),
    };
    let records = uc.execute(&document_id).await?;
    let versions = records.into_iter().map(version_summary_from).collect();

    Ok(Json(VersionListResponse {
        success: true,
        versions,
    }))
}

#[utoipa::path(
    post,
    path = "/api/documents/{document_id}/versions",
    tag = "Documents",
    params(("document_id" = String, Path, description = "Document ID")),
    request_body = RecordVersionRequest,
    responses(
        (status = 201, body = RecordVersionResponse),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
        (status = 500, body = crate::presentation::http::error::ErrorResponse)
    )
)]
pub async fn record_document_version(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(document_id): Path<String>,
    Json(req): Json<RecordVersionRequest>,
) -> Result<(StatusCode, Json<RecordVersionResponse>), ApiError> {
    let user_id = auth::validate_bearer(&ctx.cfg, bearer)?;

    let version_service = ctx.version_service();
    let uc = RecordVersion {
        versions: version_service.as_ref(),
    };
    let record = uc
        .execute(
            &document_id,
            req.text,
            req.label.as_deref(),
            Some(user_id.as_str()),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordVersionResponse {
            success: true,
            version: version_summary_from(record),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}/versions/{version}",
    tag = "Documents",
    params(
        ("document_id" = String, Path, description = "Document ID"),
        ("version" = String, Path, description = "Version number")
    ),
    responses(
        (status = 200, body = VersionContentResponse),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
        (status = 500, body = crate::presentation::http::error::ErrorResponse)
    )
)]
pub async fn get_document_version(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path((document_id, version)): Path<(String, String)>,
) -> Result<Json<VersionContentResponse>, ApiError> {
    auth::validate_bearer(&ctx.cfg, bearer)?;

    let version_service = ctx.version_service();
    let uc = GetVersionContent {
        versions: version_service.as_ref(),
    };
    let content = uc
        .execute(&document_id, parse_version_param(&version))
        .await?
        .ok_or(ApiError::NotFound(VERSION_NOT_FOUND))?;

    Ok(Json(VersionContentResponse {
        success: true,
        version: VersionContentPayload {
            version_number: content.record.version_number,
            created_at: content.record.created_at,
            created_by: content.record.created_by,
            text_length: content.text.encode_utf16().count(),
            text: content.text,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/documents/{document_id}/versions/{v1}/diff/{v2}",
    tag = "Documents",
    params(
        ("document_id" = String, Path, description = "Document ID"),
        ("v1" = String, Path, description = "Older version number"),
        ("v2" = String, Path, description = "Newer version number")
    ),
    responses(
        (status = 200, body = VersionDiffResponse),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
        (status = 500, body = crate::presentation::http::error::ErrorResponse)
    )
)]
pub async fn get_document_version_diff(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path((document_id, v1, v2)): Path<(String, String, String)>,
) -> Result<Json<VersionDiffResponse>, ApiError> {
    auth::validate_bearer(&ctx.cfg, bearer)?;

    let version_service = ctx.version_service();
    let uc = VersionDiff {
        versions: version_service.as_ref(),
    };
    let result = uc
        .execute(
            &document_id,
            parse_version_param(&v1),
            parse_version_param(&v2),
        )
        .await?
        .ok_or(ApiError::NotFound(VERSIONS_NOT_FOUND))?;

    let diff = VersionDiffPayload {
        v1: version_diff_side_response_from(&result.base),
        v2: version_diff_side_response_from(&result.target),
        changes: result.diff.changes,
        stats: result.diff.stats,
    };

    Ok(Json(VersionDiffResponse {
        success: true,
        diff,
    }))
}

// the version segment shares one parameter name across routes
pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/documents/:document_id/versions",
            get(list_document_versions).post(record_document_version),
        )
        .route(
            "/documents/:document_id/versions/:version",
            get(get_document_version),
        )
        .route(
            "/documents/:document_id/versions/:version/diff/:other",
            get(get_document_version_diff),
        )
        .with_state(ctx)
}
