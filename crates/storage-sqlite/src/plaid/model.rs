//! Database models for Plaid items and imported asset report data.

use chrono::NaiveDate;
use diesel::prelude::*;

use finvault_core::plaid::{
    AssetAccount, AssetAccountUpsert, AssetHistoricalBalance, NewPlaidAssetItem, PlaidAssetItem,
    PlaidItem,
};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::plaid_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlaidItemDB {
    pub id: i32,
    pub user_id: i32,
    pub access_token: String,
    pub ins_name: Option<String>,
    pub ins_id: Option<String>,
}

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(PlaidItemDB, foreign_key = plaid_item_id))]
#[diesel(table_name = crate::schema::plaid_asset_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlaidAssetItemDB {
    pub id: i32,
    pub plaid_item_id: i32,
    pub user_id: i32,
    pub asset_report_token: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::plaid_asset_items)]
pub struct NewPlaidAssetItemDB {
    pub plaid_item_id: i32,
    pub user_id: i32,
    pub asset_report_token: String,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetAccountDB {
    pub id: i32,
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

/// Insert values and conflict update set for an account snapshot.
/// Missing balances overwrite stale ones.
#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_accounts)]
#[diesel(treat_none_as_null = true)]
pub struct AssetAccountUpsertDB {
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

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_historical_balances)]
pub struct NewAssetHistoricalBalanceDB {
    pub account_id: String,
    pub balance_amount: f64,
    pub balance_date: NaiveDate,
}

impl From<PlaidItemDB> for PlaidItem {
    fn from(db: PlaidItemDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            access_token: db.access_token,
            ins_name: db.ins_name,
            ins_id: db.ins_id,
        }
    }
}

impl From<PlaidAssetItemDB> for PlaidAssetItem {
    fn from(db: PlaidAssetItemDB) -> Self {
        Self {
            id: db.id,
            plaid_item_id: db.plaid_item_id,
            user_id: db.user_id,
            asset_report_token: db.asset_report_token,
        }
    }
}

impl From<NewPlaidAssetItem> for NewPlaidAssetItemDB {
    fn from(domain: NewPlaidAssetItem) -> Self {
        Self {
            plaid_item_id: domain.plaid_item_id,
            user_id: domain.user_id,
            asset_report_token: domain.asset_report_token,
        }
    }
}

impl From<AssetAccountDB> for AssetAccount {
    fn from(db: AssetAccountDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            user_id: db.user_id,
            plaid_asset_item_id: db.plaid_asset_item_id,
            balance_available: db.balance_available,
            balance_current: db.balance_current,
            balance_limit: db.balance_limit,
            name: db.name,
            account_type: db.account_type,
            subtype: db.subtype,
            mask: db.mask,
            days_available: db.days_available,
        }
    }
}

impl From<AssetAccountUpsert> for AssetAccountUpsertDB {
    fn from(domain: AssetAccountUpsert) -> Self {
        Self {
            account_id: domain.account_id,
            user_id: domain.user_id,
            plaid_asset_item_id: domain.plaid_asset_item_id,
            balance_available: domain.balance_available,
            balance_current: domain.balance_current,
            balance_limit: domain.balance_limit,
            name: domain.name,
            account_type: domain.account_type,
            subtype: domain.subtype,
            mask: domain.mask,
            days_available: domain.days_available,
        }
    }
}

impl From<AssetHistoricalBalance> for NewAssetHistoricalBalanceDB {
    fn from(domain: AssetHistoricalBalance) -> Self {
        Self {
            account_id: domain.account_id,
            balance_amount: domain.balance_amount,
            balance_date: domain.balance_date,
        }
    }
}
