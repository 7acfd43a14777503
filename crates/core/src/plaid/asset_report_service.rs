use log::{debug, info, warn};
use std::sync::Arc;

use super::plaid_model::{
    AssetAccountUpsert, AssetHistoricalBalance, LinkedAssetItem, NewPlaidAssetItem,
    PlaidAssetGroup, PlaidItem, ReportImportOutcome, ReportImportStatus, ReportImportSummary,
    ReportTokenOutcome, ReportTokenStatus, ReportTokenSummary, ReportWriteSummary,
};
use super::plaid_traits::{AssetReportClient, AssetReportServiceTrait, PlaidRepositoryTrait};
use crate::errors::{Error, Result};

/// Issues asset report tokens for linked items and imports the reports.
pub struct AssetReportService {
    repository: Arc<dyn PlaidRepositoryTrait>,
    client: Arc<dyn AssetReportClient>,
}

impl AssetReportService {
    pub fn new(
        repository: Arc<dyn PlaidRepositoryTrait>,
        client: Arc<dyn AssetReportClient>,
    ) -> Self {
        Self { repository, client }
    }

    async fn issue_token(&self, item: &PlaidItem) -> Result<ReportTokenStatus> {
        let token = self
            .client
            .create_asset_report(&item.access_token, item.user_id)
            .await?;

        let created = self
            .repository
            .create_asset_item_if_absent(NewPlaidAssetItem {
                plaid_item_id: item.id,
                user_id: item.user_id,
                asset_report_token: token.asset_report_token,
            })
            .await?;

        Ok(if created {
            ReportTokenStatus::Created
        } else {
            ReportTokenStatus::AlreadyExists
        })
    }

    async fn import_one(&self, linked: &LinkedAssetItem, user_id: i32) -> Result<ReportWriteSummary> {
        let report = self
            .client
            .get_asset_report(&linked.asset_item.asset_report_token)
            .await?;

        let mut accounts = Vec::new();
        let mut balances = Vec::new();
        for report_item in &report.items {
            for account in &report_item.accounts {
                accounts.push(AssetAccountUpsert::from_report(
                    account,
                    user_id,
                    linked.asset_item.id,
                ));
                balances.extend(AssetHistoricalBalance::from_report(account));
            }
        }

        if accounts.is_empty() {
            return Ok(ReportWriteSummary::default());
        }

        self.repository
            .save_report_accounts(accounts, balances)
            .await
    }
}

#[async_trait::async_trait]
impl AssetReportServiceTrait for AssetReportService {
    async fn create_asset_report_token(&self, user_id: i32) -> Result<ReportTokenSummary> {
        let items = self.repository.list_items_for_user(user_id)?;
        if items.is_empty() {
            return Err(Error::invalid_input(
                "Access token is not generated for this user",
            ));
        }

        let mut summary = ReportTokenSummary::default();
        for item in &items {
            let status = match self.issue_token(item).await {
                Ok(status) => status,
                Err(e) => {
                    warn!(
                        "Asset report token request failed for plaid item {}: {}",
                        item.id, e
                    );
                    ReportTokenStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summary.items.push(ReportTokenOutcome {
                plaid_item_id: item.id,
                status,
            });
        }

        info!(
            "Asset report tokens for user {}: {} items, {} failed",
            user_id,
            summary.items.len(),
            summary.failed_count()
        );
        Ok(summary)
    }

    async fn import_asset_reports(&self, user_id: i32) -> Result<ReportImportSummary> {
        let linked_items = self.repository.list_asset_items_for_user(user_id)?;
        debug!(
            "Importing {} asset reports for user {}",
            linked_items.len(),
            user_id
        );

        let mut summary = ReportImportSummary::default();
        for linked in &linked_items {
            let status = match self.import_one(linked, user_id).await {
                Ok(written) => ReportImportStatus::Imported {
                    accounts_upserted: written.accounts_upserted,
                    balance_points_inserted: written.balance_points_inserted,
                },
                Err(e) => {
                    warn!(
                        "Asset report import failed for asset item {}: {}",
                        linked.asset_item.id, e
                    );
                    ReportImportStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            summary.items.push(ReportImportOutcome {
                plaid_asset_item_id: linked.asset_item.id,
                plaid_item_id: linked.plaid_item.id,
                status,
            });
        }

        info!(
            "Imported asset reports for user {}: {} items, {} failed",
            user_id,
            summary.items.len(),
            summary.failed_count()
        );
        Ok(summary)
    }

    fn get_plaid_assets(&self, user_id: i32) -> Result<Vec<PlaidAssetGroup>> {
        self.repository.list_plaid_assets_for_user(user_id)
    }
}
