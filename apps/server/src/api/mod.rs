use std::sync::Arc;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        ApiResponse, CreateManualAssetBody, FieldValueBody, FormDataBody, UpdateManualAssetBody,
    },
};
use axum::{
    http::{HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod asset_reports;
pub mod assets;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        asset_reports::create_asset_report_token,
        asset_reports::import_asset_reports,
        asset_reports::get_plaid_assets,
        assets::get_asset_details,
        assets::get_assets_lists,
        assets::get_all_assets_sub_types,
        assets::get_form_data,
        assets::add_user_asset_details,
        assets::update_user_asset_details,
        assets::delete_manual_asset,
    ),
    components(schemas(
        ApiResponse,
        CreateManualAssetBody,
        UpdateManualAssetBody,
        FormDataBody,
        FieldValueBody
    )),
    tags((name = "finvault"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);
    }
    let origins: Vec<HeaderValue> = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers(Any)
        .allow_methods(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(assets::router())
        .merge(asset_reports::router());

    Router::new()
        .nest("/api/v1", api)
        .route(
            "/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
