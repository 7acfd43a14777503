use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    main_lib::AppState,
    models::{ApiResponse, CreateManualAssetBody, FormDataBody, UpdateManualAssetBody},
};
use finvault_core::assets::{ManualAssetCreation, ManualAssetUpdate};

fn invalid_fields(ids: &[i32]) -> ApiResult<ApiResponse> {
    ApiResponse::with_data(
        StatusCode::CREATED,
        "Invalid Fields",
        &json!({ "invalid_field_ids": ids }),
    )
}

#[utoipa::path(get, path = "/api/v1/assets/details", responses((status = 200, body = ApiResponse)))]
pub async fn get_asset_details(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let details = state.asset_service.get_asset_details(user.id)?;
    ApiResponse::with_data(StatusCode::OK, "Assets fetched successfully", &details)
}

#[utoipa::path(get, path = "/api/v1/assets/types", responses((status = 200, body = ApiResponse)))]
pub async fn get_assets_lists(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let listing = state.asset_service.get_assets_lists()?;
    ApiResponse::with_data(StatusCode::OK, "Assets list fetched successfully", &listing)
}

#[utoipa::path(
    get,
    path = "/api/v1/assets/types/{asset_id}/subtypes",
    params(("asset_id" = i32, Path, description = "Asset type id")),
    responses((status = 200, body = ApiResponse), (status = 400, body = ApiResponse))
)]
pub async fn get_all_assets_sub_types(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<ApiResponse> {
    let asset_type_id = asset_id.trim().parse::<i32>().ok();
    let sub_types = state.asset_service.get_all_assets_sub_types(asset_type_id)?;
    ApiResponse::with_data(StatusCode::OK, "Assets list fetched successfully", &sub_types)
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/form",
    request_body = FormDataBody,
    responses((status = 200, body = ApiResponse), (status = 404, body = ApiResponse))
)]
pub async fn get_form_data(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<FormDataBody>, JsonRejection>,
) -> ApiResult<ApiResponse> {
    let Json(body) = payload?;
    let form = state.asset_service.get_form_data(body.into(), user.id)?;
    ApiResponse::with_data(StatusCode::OK, "Form fields fetched successfully", &form)
}

#[utoipa::path(
    post,
    path = "/api/v1/assets/manual",
    request_body = CreateManualAssetBody,
    responses((status = 201, body = ApiResponse), (status = 400, body = ApiResponse))
)]
pub async fn add_user_asset_details(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CreateManualAssetBody>, JsonRejection>,
) -> ApiResult<ApiResponse> {
    let Json(body) = payload?;
    match state
        .asset_service
        .add_user_asset_details(body.into(), user.id)
        .await?
    {
        ManualAssetCreation::Created(asset) => ApiResponse::with_data(
            StatusCode::CREATED,
            "Asset created successfully",
            &json!({ "id": asset.id }),
        ),
        ManualAssetCreation::InvalidFields(ids) => invalid_fields(&ids),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/assets/manual",
    request_body = UpdateManualAssetBody,
    responses((status = 200, body = ApiResponse), (status = 404, body = ApiResponse))
)]
pub async fn update_user_asset_details(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<UpdateManualAssetBody>, JsonRejection>,
) -> ApiResult<ApiResponse> {
    let Json(body) = payload?;
    match state
        .asset_service
        .update_user_asset_details(body.into(), user.id)
        .await?
    {
        ManualAssetUpdate::Updated { asset_id, summary } => ApiResponse::with_data(
            StatusCode::OK,
            "Asset updated successfully",
            &json!({
                "asset_id": asset_id,
                "updated": summary.updated,
                "inserted": summary.inserted,
                "skipped": summary.skipped,
            }),
        ),
        ManualAssetUpdate::InvalidFields(ids) => invalid_fields(&ids),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/assets/manual/{asset_id}",
    params(("asset_id" = i32, Path, description = "Manual asset id")),
    responses((status = 200, body = ApiResponse), (status = 400, body = ApiResponse))
)]
pub async fn delete_manual_asset(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> ApiResult<ApiResponse> {
    // Unparseable ids fall through to the ownership check and fail there.
    let asset_id = asset_id.trim().parse::<i32>().unwrap_or(0);
    state
        .asset_service
        .delete_manual_asset(user.id, asset_id)
        .await?;
    Ok(ApiResponse::empty(
        StatusCode::OK,
        "Asset deleted successfully!",
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets/details", get(get_asset_details))
        .route("/assets/types", get(get_assets_lists))
        .route(
            "/assets/types/{asset_id}/subtypes",
            get(get_all_assets_sub_types),
        )
        .route("/assets/form", post(get_form_data))
        .route(
            "/assets/manual",
            post(add_user_asset_details).put(update_user_asset_details),
        )
        .route("/assets/manual/{asset_id}", delete(delete_manual_asset))
}
