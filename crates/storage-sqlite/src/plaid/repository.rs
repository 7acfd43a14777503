use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use finvault_core::plaid::{
    AssetAccount, AssetAccountSummary, AssetAccountUpsert, AssetHistoricalBalance,
    LinkedAssetItem, NewPlaidAssetItem, PlaidAssetGroup, PlaidAssetItem, PlaidItem,
    PlaidItemSummary, PlaidRepositoryTrait, ReportWriteSummary,
};
use finvault_core::Result;

use super::model::{
    AssetAccountDB, AssetAccountUpsertDB, NewAssetHistoricalBalanceDB, NewPlaidAssetItemDB,
    PlaidAssetItemDB, PlaidItemDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{asset_accounts, asset_historical_balances, plaid_asset_items, plaid_items};
use crate::utils::chunk_for_sqlite;

pub struct PlaidRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PlaidRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn load_linked_items(
        conn: &mut SqliteConnection,
        user_id: i32,
    ) -> std::result::Result<Vec<(PlaidAssetItemDB, PlaidItemDB)>, StorageError> {
        Ok(plaid_asset_items::table
            .inner_join(plaid_items::table)
            .filter(plaid_items::user_id.eq(user_id))
            .order(plaid_asset_items::id.asc())
            .select((PlaidAssetItemDB::as_select(), PlaidItemDB::as_select()))
            .load::<(PlaidAssetItemDB, PlaidItemDB)>(conn)?)
    }
}

#[async_trait]
impl PlaidRepositoryTrait for PlaidRepository {
    fn list_items_for_user(&self, user_id: i32) -> Result<Vec<PlaidItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = plaid_items::table
            .filter(plaid_items::user_id.eq(user_id))
            .order(plaid_items::id.asc())
            .select(PlaidItemDB::as_select())
            .load::<PlaidItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(PlaidItem::from).collect())
    }

    fn list_asset_items_for_user(&self, user_id: i32) -> Result<Vec<LinkedAssetItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = Self::load_linked_items(&mut conn, user_id)?;
        Ok(rows
            .into_iter()
            .map(|(asset_item, plaid_item)| LinkedAssetItem {
                asset_item: PlaidAssetItem::from(asset_item),
                plaid_item: PlaidItem::from(plaid_item),
            })
            .collect())
    }

    fn list_plaid_assets_for_user(&self, user_id: i32) -> Result<Vec<PlaidAssetGroup>> {
        let mut conn = get_connection(&self.pool)?;
        let linked = Self::load_linked_items(&mut conn, user_id)?;
        if linked.is_empty() {
            return Ok(Vec::new());
        }

        let asset_item_ids: Vec<i32> = linked.iter().map(|(a, _)| a.id).collect();
        let mut accounts_by_item: HashMap<i32, Vec<AssetAccountSummary>> = HashMap::new();
        for chunk in chunk_for_sqlite(&asset_item_ids) {
            let accounts = asset_accounts::table
                .filter(asset_accounts::user_id.eq(user_id))
                .filter(asset_accounts::plaid_asset_item_id.eq_any(chunk))
                .order(asset_accounts::id.asc())
                .select(AssetAccountDB::as_select())
                .load::<AssetAccountDB>(&mut conn)
                .map_err(StorageError::from)?;
            for account in accounts {
                accounts_by_item
                    .entry(account.plaid_asset_item_id)
                    .or_default()
                    .push(AssetAccount::from(account).into());
            }
        }

        Ok(linked
            .into_iter()
            .map(|(asset_item, plaid_item)| PlaidAssetGroup {
                id: asset_item.id,
                plaid_item: PlaidItemSummary {
                    id: plaid_item.id,
                    ins_name: plaid_item.ins_name,
                    ins_id: plaid_item.ins_id,
                },
                asset_accounts: accounts_by_item.remove(&asset_item.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn create_asset_item_if_absent(&self, new_item: NewPlaidAssetItem) -> Result<bool> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                // plaid_item_id is unique: an existing handle keeps its token
                let inserted = diesel::insert_or_ignore_into(plaid_asset_items::table)
                    .values(NewPlaidAssetItemDB::from(new_item))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted == 1)
            })
            .await
    }

    async fn save_report_accounts(
        &self,
        accounts: Vec<AssetAccountUpsert>,
        balances: Vec<AssetHistoricalBalance>,
    ) -> Result<ReportWriteSummary> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ReportWriteSummary> {
                let mut summary = ReportWriteSummary::default();

                for account in accounts {
                    let row = AssetAccountUpsertDB::from(account);
                    summary.accounts_upserted += diesel::insert_into(asset_accounts::table)
                        .values(&row)
                        .on_conflict(asset_accounts::account_id)
                        .do_update()
                        .set(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                let rows: Vec<NewAssetHistoricalBalanceDB> = balances
                    .into_iter()
                    .map(NewAssetHistoricalBalanceDB::from)
                    .collect();
                for chunk in chunk_for_sqlite(&rows) {
                    summary.balance_points_inserted +=
                        diesel::insert_or_ignore_into(asset_historical_balances::table)
                            .values(chunk)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                }

                debug!(
                    "Saved report accounts: {} upserted, {} balance points inserted",
                    summary.accounts_upserted, summary.balance_points_inserted
                );
                Ok(summary)
            })
            .await
    }
}
