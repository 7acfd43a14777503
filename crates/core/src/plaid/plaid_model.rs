//! Models for linked institutions, asset report handles and the accounts
//! and balances imported from asset reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A linked institution connection of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaidItem {
    pub id: i32,
    pub user_id: i32,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub ins_name: Option<String>,
    pub ins_id: Option<String>,
}

/// The asset report handle issued for one PlaidItem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaidAssetItem {
    pub id: i32,
    pub plaid_item_id: i32,
    pub user_id: i32,
    pub asset_report_token: String,
}

/// Input model for storing a new asset report handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPlaidAssetItem {
    pub plaid_item_id: i32,
    pub user_id: i32,
    pub asset_report_token: String,
}

/// A PlaidAssetItem joined with its parent PlaidItem.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedAssetItem {
    pub asset_item: PlaidAssetItem,
    pub plaid_item: PlaidItem,
}

/// Snapshot of an externally-held account, keyed by the provider's `account_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetAccount {
    pub id: i32,
    pub account_id: String,
    pub user_id: i32,
    pub plaid_asset_item_id: i32,
    pub balance_available: Option<f64>,
    pub balance_current: Option<f64>,
    pub balance_limit: Option<f64>,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub days_available: Option<i32>,
}

/// Values written when upserting an AssetAccount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetAccountUpsert {
    pub account_id: String,
    pub user_id: i32,
    pub plaid_asset_item_id: i32,
    pub balance_available: Option<f64>,
    pub balance_current: Option<f64>,
    pub balance_limit: Option<f64>,
    pub name: String,
    pub account_type: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub days_available: Option<i32>,
}

impl AssetAccountUpsert {
    /// Maps a report account onto the local snapshot owned by `user_id`.
    pub fn from_report(account: &ReportAccount, user_id: i32, plaid_asset_item_id: i32) -> Self {
        Self {
            account_id: account.account_id.clone(),
            user_id,
            plaid_asset_item_id,
            balance_available: account.balances.available,
            balance_current: account.balances.current,
            balance_limit: account.balances.limit,
            name: account.name.clone(),
            account_type: account.account_type.clone(),
            subtype: account.subtype.clone(),
            mask: account.mask.clone(),
            days_available: account.days_available.map(|d| d.round() as i32),
        }
    }
}

/// One historical balance point. Unique per (account_id, balance_date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetHistoricalBalance {
    pub account_id: String,
    pub balance_amount: f64,
    pub balance_date: NaiveDate,
}

impl AssetHistoricalBalance {
    /// Collects the balance points of a report account, dropping points
    /// without a current amount.
    pub fn from_report(account: &ReportAccount) -> Vec<Self> {
        account
            .historical_balances
            .iter()
            .filter_map(|b| {
                b.current.map(|amount| Self {
                    account_id: account.account_id.clone(),
                    balance_amount: amount,
                    balance_date: b.date,
                })
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Response of an asset report creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetReportToken {
    pub asset_report_token: String,
    #[serde(default)]
    pub asset_report_id: Option<String>,
}

/// A generated asset report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetReport {
    #[serde(default)]
    pub asset_report_id: Option<String>,
    #[serde(default)]
    pub items: Vec<AssetReportItem>,
}

/// One institution inside an asset report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AssetReportItem {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub institution_id: Option<String>,
    #[serde(default)]
    pub institution_name: Option<String>,
    #[serde(default)]
    pub accounts: Vec<ReportAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportAccount {
    pub account_id: String,
    #[serde(default)]
    pub balances: ReportBalances,
    #[serde(default)]
    pub days_available: Option<f64>,
    #[serde(default)]
    pub historical_balances: Vec<ReportHistoricalBalance>,
    #[serde(default)]
    pub mask: Option<String>,
    pub name: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportBalances {
    pub available: Option<f64>,
    pub current: Option<f64>,
    pub limit: Option<f64>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportHistoricalBalance {
    pub current: Option<f64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Views and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Institution fields shown next to synced accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaidItemSummary {
    pub id: i32,
    pub ins_name: Option<String>,
    pub ins_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetAccountSummary {
    pub id: i32,
    pub balance_available: Option<f64>,
    pub balance_current: Option<f64>,
    pub name: String,
    pub account_id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
}

impl From<AssetAccount> for AssetAccountSummary {
    fn from(account: AssetAccount) -> Self {
        Self {
            id: account.id,
            balance_available: account.balance_available,
            balance_current: account.balance_current,
            name: account.name,
            account_id: account.account_id,
            account_type: account.account_type,
            subtype: account.subtype,
            mask: account.mask,
        }
    }
}

/// A user's synced accounts grouped under one asset report handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaidAssetGroup {
    pub id: i32,
    #[serde(rename = "PlaidItem")]
    pub plaid_item: PlaidItemSummary,
    #[serde(rename = "AssetAccount")]
    pub asset_accounts: Vec<AssetAccountSummary>,
}

/// Rows written while importing one report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportWriteSummary {
    pub accounts_upserted: usize,
    pub balance_points_inserted: usize,
}

/// Result of requesting a report token for one linked item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportTokenStatus {
    Created,
    AlreadyExists,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportTokenOutcome {
    pub plaid_item_id: i32,
    #[serde(flatten)]
    pub status: ReportTokenStatus,
}

/// Per-item results of a token issuance run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportTokenSummary {
    pub items: Vec<ReportTokenOutcome>,
}

impl ReportTokenSummary {
    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|o| matches!(o.status, ReportTokenStatus::Failed { .. }))
            .count()
    }
}

/// Result of importing the report of one asset item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportImportStatus {
    Imported {
        accounts_upserted: usize,
        balance_points_inserted: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportImportOutcome {
    pub plaid_asset_item_id: i32,
    pub plaid_item_id: i32,
    #[serde(flatten)]
    pub status: ReportImportStatus,
}

/// Per-item results of an import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportImportSummary {
    pub items: Vec<ReportImportOutcome>,
}

impl ReportImportSummary {
    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|o| matches!(o.status, ReportImportStatus::Failed { .. }))
            .count()
    }
}
