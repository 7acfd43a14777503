use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState, models::ApiResponse};

#[utoipa::path(
    post,
    path = "/api/v1/assets/report-token",
    responses((status = 201, body = ApiResponse), (status = 400, body = ApiResponse))
)]
pub async fn create_asset_report_token(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let summary = state
        .asset_report_service
        .create_asset_report_token(user.id)
        .await?;
    if summary.failed_count() > 0 {
        tracing::warn!(
            "Report token issuance for user {} failed for {} of {} items",
            user.id,
            summary.failed_count(),
            summary.items.len()
        );
    }
    ApiResponse::with_data(
        StatusCode::CREATED,
        "Asset report token generated successfully",
        &summary,
    )
}

#[utoipa::path(post, path = "/api/v1/assets/import", responses((status = 200, body = ApiResponse)))]
pub async fn import_asset_reports(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let summary = state
        .asset_report_service
        .import_asset_reports(user.id)
        .await?;
    ApiResponse::with_data(StatusCode::OK, "Assets data imported successfully", &summary)
}

#[utoipa::path(get, path = "/api/v1/assets/plaid", responses((status = 200, body = ApiResponse)))]
pub async fn get_plaid_assets(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let groups = state.asset_report_service.get_plaid_assets(user.id)?;
    ApiResponse::with_data(StatusCode::OK, "Plaid assets fetched successfully", &groups)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets/report-token", post(create_asset_report_token))
        .route("/assets/import", post(import_asset_reports))
        .route("/assets/plaid", get(get_plaid_assets))
}
