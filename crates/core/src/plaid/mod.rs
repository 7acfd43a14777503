//! Plaid asset reports: token issuance, report import and synced account views.

mod asset_report_service;
mod plaid_model;
mod plaid_traits;


pub use asset_report_service::AssetReportService;
pub use plaid_model::{
    AssetAccount, AssetAccountSummary, AssetAccountUpsert, AssetHistoricalBalance, AssetReport,
    AssetReportItem, AssetReportToken, LinkedAssetItem, NewPlaidAssetItem, PlaidAssetGroup,
    PlaidAssetItem, PlaidItem, PlaidItemSummary, ReportAccount, ReportBalances,
    ReportHistoricalBalance, ReportImportOutcome, ReportImportStatus, ReportImportSummary,
    ReportTokenOutcome, ReportTokenStatus, ReportTokenSummary, ReportWriteSummary,
};
pub use plaid_traits::{AssetReportClient, AssetReportServiceTrait, PlaidRepositoryTrait};
