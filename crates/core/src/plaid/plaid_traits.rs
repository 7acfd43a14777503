//! Traits for the asset report provider, Plaid persistence and the
//! asset report service.

use async_trait::async_trait;

use super::plaid_model::{
    AssetAccountUpsert, AssetHistoricalBalance, AssetReport, AssetReportToken, LinkedAssetItem,
    NewPlaidAssetItem, PlaidAssetGroup, PlaidItem, ReportImportSummary, ReportTokenSummary,
    ReportWriteSummary,
};
use crate::errors::Result;

/// Client for the aggregation provider's asset report endpoints.
#[async_trait]
pub trait AssetReportClient: Send + Sync {
    /// Requests a new asset report for one linked item.
    async fn create_asset_report(
        &self,
        access_token: &str,
        user_id: i32,
    ) -> Result<AssetReportToken>;

    /// Fetches a previously requested asset report.
    async fn get_asset_report(&self, asset_report_token: &str) -> Result<AssetReport>;
}

#[async_trait]
pub trait PlaidRepositoryTrait: Send + Sync {
    fn list_items_for_user(&self, user_id: i32) -> Result<Vec<PlaidItem>>;

    /// Lists the user's asset items joined with their PlaidItem.
    fn list_asset_items_for_user(&self, user_id: i32) -> Result<Vec<LinkedAssetItem>>;

    /// Lists asset items with their institution and the user's synced accounts.
    fn list_plaid_assets_for_user(&self, user_id: i32) -> Result<Vec<PlaidAssetGroup>>;

    /// Stores the asset item unless one already exists for the PlaidItem.
    /// Returns true when a row was written.
    async fn create_asset_item_if_absent(&self, new_item: NewPlaidAssetItem) -> Result<bool>;

    /// Upserts accounts and appends balance points in one transaction.
    async fn save_report_accounts(
        &self,
        accounts: Vec<AssetAccountUpsert>,
        balances: Vec<AssetHistoricalBalance>,
    ) -> Result<ReportWriteSummary>;
}

#[async_trait]
pub trait AssetReportServiceTrait: Send + Sync {
    async fn create_asset_report_token(&self, user_id: i32) -> Result<ReportTokenSummary>;

    async fn import_asset_reports(&self, user_id: i32) -> Result<ReportImportSummary>;

    fn get_plaid_assets(&self, user_id: i32) -> Result<Vec<PlaidAssetGroup>>;
}
