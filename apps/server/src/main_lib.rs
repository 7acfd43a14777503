use std::sync::Arc;

use crate::config::Config;
use finvault_connect::PlaidApiClient;
use finvault_core::{
    assets::{AssetService, AssetServiceTrait},
    plaid::{AssetReportService, AssetReportServiceTrait},
};
use finvault_storage_sqlite::{
    assets::{AssetCatalogRepository, ManualAssetRepository},
    db::{self, spawn_writer},
    plaid::PlaidRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub asset_service: Arc<dyn AssetServiceTrait>,
    pub asset_report_service: Arc<dyn AssetReportServiceTrait>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let pool = db::create_pool(&config.db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone()));
    let catalog_repository = Arc::new(AssetCatalogRepository::new(pool.clone()));
    let manual_asset_repository =
        Arc::new(ManualAssetRepository::new(pool.clone(), writer.clone()));
    let plaid_repository = Arc::new(PlaidRepository::new(pool.clone(), writer.clone()));

    let asset_service = Arc::new(AssetService::new(
        catalog_repository,
        manual_asset_repository,
        user_repository,
    ));

    let plaid_client = Arc::new(PlaidApiClient::new(config.plaid.clone())?);
    tracing::info!(
        "Plaid client configured for {} ({})",
        config.plaid.environment,
        plaid_client.base_url()
    );
    let asset_report_service = Arc::new(AssetReportService::new(plaid_repository, plaid_client));

    Ok(Arc::new(AppState {
        asset_service,
        asset_report_service,
    }))
}
