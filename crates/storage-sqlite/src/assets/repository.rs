use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use finvault_core::assets::{
    AssetCatalogRepositoryTrait, AssetField, AssetFieldSummary, AssetFieldValue, AssetSubType,
    AssetType, FieldUpdateSummary, FieldValue, InstitutionRef, ManualAssetDetail,
    ManualAssetRepositoryTrait, ManualAssetWithValues, NameRef, NewUserManualAsset,
    UserManualAsset,
};
use finvault_core::{Error, Result};

use super::model::{
    AssetFieldDB, AssetSubTypeDB, AssetTypeDB, NewUserAssetDetailDB, NewUserManualAssetDB,
    UserAssetDetailDB, UserManualAssetDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{
    asset_fields, asset_sub_types, asset_types, plaid_items, user_assets_details,
    user_manual_assets,
};
use crate::utils::chunk_for_sqlite;

/// Read-only repository over the seeded asset catalog.
pub struct AssetCatalogRepository {
    pool: Arc<DbPool>,
}

impl AssetCatalogRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl AssetCatalogRepositoryTrait for AssetCatalogRepository {
    fn list_asset_types(&self) -> Result<Vec<AssetType>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = asset_types::table
            .order(asset_types::id.asc())
            .select(AssetTypeDB::as_select())
            .load::<AssetTypeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AssetType::from).collect())
    }

    fn list_sub_types(&self, asset_type_id: Option<i32>) -> Result<Vec<AssetSubType>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = asset_sub_types::table
            .select(AssetSubTypeDB::as_select())
            .into_boxed();
        if let Some(type_id) = asset_type_id {
            query = query.filter(asset_sub_types::asset_id.eq(type_id));
        }
        let rows = query
            .order(asset_sub_types::id.asc())
            .load::<AssetSubTypeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AssetSubType::from).collect())
    }

    fn list_fields(&self, asset_type_id: i32, asset_sub_id: i32) -> Result<Vec<AssetField>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = load_schema(&mut conn, asset_type_id, asset_sub_id)?;
        Ok(rows.into_iter().map(AssetField::from).collect())
    }
}

fn load_schema(
    conn: &mut SqliteConnection,
    asset_type_id: i32,
    asset_sub_id: i32,
) -> std::result::Result<Vec<AssetFieldDB>, StorageError> {
    Ok(asset_fields::table
        .filter(asset_fields::asset_type_id.eq(asset_type_id))
        .filter(asset_fields::asset_sub_id.eq(asset_sub_id))
        .order((asset_fields::order_id.asc(), asset_fields::id.asc()))
        .select(AssetFieldDB::as_select())
        .load::<AssetFieldDB>(conn)?)
}

/// Loads the values of the given assets joined with their field, ordered by
/// the field's `order_id`.
fn load_values(
    conn: &mut SqliteConnection,
    asset_ids: &[i32],
) -> std::result::Result<HashMap<i32, Vec<AssetFieldValue>>, StorageError> {
    let mut by_asset: HashMap<i32, Vec<AssetFieldValue>> = HashMap::new();
    for chunk in chunk_for_sqlite(asset_ids) {
        let rows = user_assets_details::table
            .inner_join(asset_fields::table)
            .filter(user_assets_details::asset_id.eq_any(chunk))
            .order((asset_fields::order_id.asc(), asset_fields::id.asc()))
            .select((
                UserAssetDetailDB::as_select(),
                (asset_fields::id, asset_fields::label, asset_fields::order_id),
            ))
            .load::<(UserAssetDetailDB, (i32, String, i32))>(conn)?;

        for (detail, (field_id, label, order_id)) in rows {
            by_asset
                .entry(detail.asset_id)
                .or_default()
                .push(AssetFieldValue {
                    field_id: detail.field_id,
                    value: detail.value,
                    asset_field: AssetFieldSummary {
                        id: field_id,
                        label,
                        order_id,
                    },
                });
        }
    }
    Ok(by_asset)
}

pub struct ManualAssetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ManualAssetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    fn find_owned(
        conn: &mut SqliteConnection,
        asset_id: i32,
        owner_id: i32,
    ) -> std::result::Result<Option<UserManualAssetDB>, StorageError> {
        Ok(user_manual_assets::table
            .filter(user_manual_assets::id.eq(asset_id))
            .filter(user_manual_assets::user_id.eq(owner_id))
            .select(UserManualAssetDB::as_select())
            .first::<UserManualAssetDB>(conn)
            .optional()?)
    }

    fn load_names(
        conn: &mut SqliteConnection,
        assets: &[UserManualAssetDB],
    ) -> std::result::Result<(HashMap<i32, String>, HashMap<i32, String>), StorageError> {
        let type_ids: Vec<i32> = assets
            .iter()
            .map(|a| a.asset_type_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let sub_ids: Vec<i32> = assets
            .iter()
            .map(|a| a.asset_subtype_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let type_names = asset_types::table
            .filter(asset_types::id.eq_any(&type_ids))
            .select((asset_types::id, asset_types::name))
            .load::<(i32, String)>(conn)?
            .into_iter()
            .collect();
        let sub_names = asset_sub_types::table
            .filter(asset_sub_types::id.eq_any(&sub_ids))
            .select((asset_sub_types::id, asset_sub_types::name))
            .load::<(i32, String)>(conn)?
            .into_iter()
            .collect();

        Ok((type_names, sub_names))
    }

    fn load_institutions(
        conn: &mut SqliteConnection,
        assets: &[UserManualAssetDB],
    ) -> std::result::Result<HashMap<i32, InstitutionRef>, StorageError> {
        let item_ids: Vec<i32> = assets.iter().filter_map(|a| a.ins_id).collect();
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(plaid_items::table
            .filter(plaid_items::id.eq_any(&item_ids))
            .select((plaid_items::id, plaid_items::ins_name, plaid_items::ins_id))
            .load::<(i32, Option<String>, Option<String>)>(conn)?
            .into_iter()
            .map(|(item_id, ins_name, ins_id)| (item_id, InstitutionRef { ins_name, ins_id }))
            .collect())
    }
}

#[async_trait]
impl ManualAssetRepositoryTrait for ManualAssetRepository {
    fn get_for_user(&self, asset_id: i32, user_id: i32) -> Result<Option<UserManualAsset>> {
        let mut conn = get_connection(&self.pool)?;
        let asset = Self::find_owned(&mut conn, asset_id, user_id)?;
        Ok(asset.map(UserManualAsset::from))
    }

    fn get_with_values(
        &self,
        asset_id: i32,
        user_id: i32,
    ) -> Result<Option<ManualAssetWithValues>> {
        let mut conn = get_connection(&self.pool)?;
        let Some(asset) = Self::find_owned(&mut conn, asset_id, user_id)? else {
            return Ok(None);
        };
        let mut values = load_values(&mut conn, &[asset.id])?;

        Ok(Some(ManualAssetWithValues {
            id: asset.id,
            asset_type_id: asset.asset_type_id,
            asset_subtype_id: asset.asset_subtype_id,
            asset_fields: values.remove(&asset.id).unwrap_or_default(),
        }))
    }

    fn list_details_for_user(&self, user_id: i32) -> Result<Vec<ManualAssetDetail>> {
        let mut conn = get_connection(&self.pool)?;
        let assets = user_manual_assets::table
            .filter(user_manual_assets::user_id.eq(user_id))
            .order(user_manual_assets::id.asc())
            .select(UserManualAssetDB::as_select())
            .load::<UserManualAssetDB>(&mut conn)
            .map_err(StorageError::from)?;
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        let (type_names, sub_names) = Self::load_names(&mut conn, &assets)?;
        let institutions = Self::load_institutions(&mut conn, &assets)?;
        let asset_ids: Vec<i32> = assets.iter().map(|a| a.id).collect();
        let mut values = load_values(&mut conn, &asset_ids)?;

        Ok(assets
            .into_iter()
            .map(|asset| ManualAssetDetail {
                id: asset.id,
                asset_type_id: asset.asset_type_id,
                asset_subtype_id: asset.asset_subtype_id,
                asset_type: type_names
                    .get(&asset.asset_type_id)
                    .map(|name| NameRef { name: name.clone() }),
                asset_sub_type: sub_names
                    .get(&asset.asset_subtype_id)
                    .map(|name| NameRef { name: name.clone() }),
                asset_fields: values.remove(&asset.id).unwrap_or_default(),
                institution: asset.ins_id.and_then(|i| institutions.get(&i).cloned()),
                account_id: asset.account_id,
            })
            .collect())
    }

    fn institution_belongs_to(&self, plaid_item_id: i32, user_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let owned = diesel::select(diesel::dsl::exists(
            plaid_items::table
                .filter(plaid_items::id.eq(plaid_item_id))
                .filter(plaid_items::user_id.eq(user_id)),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?;
        Ok(owned)
    }

    async fn create_with_details(
        &self,
        new_asset: NewUserManualAsset,
        field_data: Vec<FieldValue>,
    ) -> Result<UserManualAsset> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserManualAsset> {
                let asset_db = diesel::insert_into(user_manual_assets::table)
                    .values(NewUserManualAssetDB::from(new_asset))
                    .returning(UserManualAssetDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;

                let details: Vec<NewUserAssetDetailDB> = field_data
                    .into_iter()
                    .map(|f| NewUserAssetDetailDB {
                        asset_id: asset_db.id,
                        field_id: f.field_id,
                        value: f.value,
                    })
                    .collect();
                if !details.is_empty() {
                    diesel::insert_into(user_assets_details::table)
                        .values(&details)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                Ok(UserManualAsset::from(asset_db))
            })
            .await
    }

    async fn apply_field_values(
        &self,
        asset: UserManualAsset,
        field_data: Vec<FieldValue>,
    ) -> Result<FieldUpdateSummary> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FieldUpdateSummary> {
                let schema_ids: HashSet<i32> =
                    load_schema(conn, asset.asset_type_id, asset.asset_subtype_id)?
                        .into_iter()
                        .map(|f| f.id)
                        .collect();

                let mut summary = FieldUpdateSummary::default();
                for field in field_data {
                    let existing = user_assets_details::table
                        .filter(user_assets_details::asset_id.eq(asset.id))
                        .filter(user_assets_details::field_id.eq(field.field_id))
                        .select(user_assets_details::id)
                        .first::<i32>(conn)
                        .optional()
                        .map_err(StorageError::from)?;

                    match existing {
                        Some(detail_id) => {
                            diesel::update(user_assets_details::table.find(detail_id))
                                .set(user_assets_details::value.eq(field.value))
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            summary.updated += 1;
                        }
                        None if schema_ids.contains(&field.field_id) => {
                            diesel::insert_into(user_assets_details::table)
                                .values(NewUserAssetDetailDB {
                                    asset_id: asset.id,
                                    field_id: field.field_id,
                                    value: field.value,
                                })
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            summary.inserted += 1;
                        }
                        None => summary.skipped += 1,
                    }
                }
                Ok(summary)
            })
            .await
    }

    async fn delete_with_details(&self, asset_id: i32, user_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                if Self::find_owned(conn, asset_id, user_id)?.is_none() {
                    return Err(Error::NotFound(format!(
                        "Asset not found with id : {}",
                        asset_id
                    )));
                }

                let removed_values = diesel::delete(
                    user_assets_details::table.filter(user_assets_details::asset_id.eq(asset_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                diesel::delete(
                    user_manual_assets::table
                        .filter(user_manual_assets::id.eq(asset_id))
                        .filter(user_manual_assets::user_id.eq(user_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                Ok(removed_values)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use finvault_core::assets::UserAssetDetail;
    use tempfile::tempdir;

    async fn setup() -> (
        AssetCatalogRepository,
        ManualAssetRepository,
        Arc<DbPool>,
        tempfile::TempDir,
    ) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let mut conn = get_connection(&pool).expect("Failed to get connection");
        diesel::sql_query(
            "INSERT INTO users (id, email, name) VALUES (1, 'ada@example.com', 'Ada'), (2, 'bob@example.com', NULL)",
        )
        .execute(&mut conn)
        .expect("Failed to create users");
        diesel::sql_query(
            "INSERT INTO plaid_items (id, user_id, access_token, ins_name, ins_id) VALUES (7, 1, 'access-1', 'First Bank', 'ins_109508')",
        )
        .execute(&mut conn)
        .expect("Failed to create plaid item");

        (
            AssetCatalogRepository::new(Arc::clone(&pool)),
            ManualAssetRepository::new(Arc::clone(&pool), writer),
            pool,
            temp_dir,
        )
    }

    fn value(field_id: i32, value: &str) -> FieldValue {
        FieldValue {
            field_id,
            value: value.to_string(),
        }
    }

    fn new_asset(user_id: i32) -> NewUserManualAsset {
        NewUserManualAsset {
            user_id,
            asset_type_id: 1,
            asset_subtype_id: 2,
            account_id: None,
            ins_id: None,
        }
    }

    fn details_of(pool: &DbPool, asset_id: i32) -> Vec<UserAssetDetail> {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        user_assets_details::table
            .filter(user_assets_details::asset_id.eq(asset_id))
            .order(user_assets_details::id.asc())
            .select(UserAssetDetailDB::as_select())
            .load::<UserAssetDetailDB>(&mut conn)
            .expect("Failed to load details")
            .into_iter()
            .map(UserAssetDetail::from)
            .collect()
    }

    #[tokio::test]
    async fn seeded_catalog_is_available() {
        let (catalog, _, _pool, _dir) = setup().await;

        let types = catalog.list_asset_types().unwrap();
        assert_eq!(types.len(), 4);
        assert!(types[0].has_sub_type);
        assert!(!types[2].has_sub_type);

        let subs = catalog.list_sub_types(Some(1)).unwrap();
        assert_eq!(
            subs.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(catalog.list_sub_types(None).unwrap().len(), 6);
    }

    #[tokio::test]
    async fn fields_are_ordered_and_options_decoded() {
        let (catalog, _, _pool, _dir) = setup().await;

        let fields = catalog.list_fields(1, 2).unwrap();
        let orders: Vec<i32> = fields.iter().map(|f| f.order_id).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
        assert_eq!(fields.last().unwrap().id, 10);

        let cash = catalog.list_fields(4, 6).unwrap();
        assert_eq!(
            cash[0].options.as_deref(),
            Some(&["USD".to_string(), "EUR".into(), "GBP".into(), "CAD".into()][..])
        );
        assert!(catalog.list_fields(1, 5).unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_update_reuses_detail_row() {
        let (_, repo, pool, _dir) = setup().await;

        let asset = repo
            .create_with_details(new_asset(1), vec![value(10, "100")])
            .await
            .unwrap();
        let before = details_of(&pool, asset.id);
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].value, "100");

        let summary = repo
            .apply_field_values(asset.clone(), vec![value(10, "200")])
            .await
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.inserted, 0);

        let after = details_of(&pool, asset.id);
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, before[0].id);
        assert_eq!(after[0].value, "200");
    }

    #[tokio::test]
    async fn update_inserts_schema_fields_and_skips_foreign_ones() {
        let (_, repo, pool, _dir) = setup().await;
        let asset = repo
            .create_with_details(new_asset(1), vec![value(10, "100")])
            .await
            .unwrap();

        let summary = repo
            .apply_field_values(asset.clone(), vec![value(6, "Honda"), value(1, "Ford")])
            .await
            .unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(details_of(&pool, asset.id).len(), 2);
    }

    #[tokio::test]
    async fn values_follow_field_order() {
        let (_, repo, _pool, _dir) = setup().await;
        let asset = repo
            .create_with_details(
                new_asset(1),
                vec![value(10, "100"), value(6, "Honda"), value(8, "2019")],
            )
            .await
            .unwrap();

        let loaded = repo.get_with_values(asset.id, 1).unwrap().unwrap();
        let ids: Vec<i32> = loaded.asset_fields.iter().map(|v| v.field_id).collect();
        assert_eq!(ids, vec![6, 8, 10]);
        assert_eq!(loaded.asset_fields[0].asset_field.label, "Make");

        assert!(repo.get_with_values(asset.id, 2).unwrap().is_none());
        assert!(repo.get_for_user(asset.id, 2).unwrap().is_none());
    }

    #[tokio::test]
    async fn details_listing_includes_names_and_institution() {
        let (_, repo, _pool, _dir) = setup().await;
        let mut linked = new_asset(1);
        linked.ins_id = Some(7);
        linked.account_id = Some("acc-9".to_string());
        repo.create_with_details(linked, vec![value(10, "100")])
            .await
            .unwrap();
        repo.create_with_details(new_asset(2), vec![value(10, "5")])
            .await
            .unwrap();

        let details = repo.list_details_for_user(1).unwrap();
        assert_eq!(details.len(), 1);
        let detail = &details[0];
        assert_eq!(detail.asset_type.as_ref().unwrap().name, "Vehicle");
        assert_eq!(detail.asset_sub_type.as_ref().unwrap().name, "Motorcycle");
        assert_eq!(
            detail.institution.as_ref().unwrap().ins_name.as_deref(),
            Some("First Bank")
        );
        assert_eq!(detail.account_id.as_deref(), Some("acc-9"));
        assert_eq!(detail.asset_fields.len(), 1);
    }

    #[tokio::test]
    async fn institution_ownership_is_scoped_to_user() {
        let (_, repo, _pool, _dir) = setup().await;

        assert!(repo.institution_belongs_to(7, 1).unwrap());
        assert!(!repo.institution_belongs_to(7, 2).unwrap());
        assert!(!repo.institution_belongs_to(99, 1).unwrap());
    }

    #[tokio::test]
    async fn delete_removes_parent_and_children() {
        let (_, repo, pool, _dir) = setup().await;
        let asset = repo
            .create_with_details(new_asset(1), vec![value(10, "100"), value(6, "Honda")])
            .await
            .unwrap();

        let removed = repo.delete_with_details(asset.id, 1).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.get_for_user(asset.id, 1).unwrap().is_none());
        assert!(details_of(&pool, asset.id).is_empty());
    }

    #[tokio::test]
    async fn delete_of_foreign_asset_writes_nothing() {
        let (_, repo, pool, _dir) = setup().await;
        let asset = repo
            .create_with_details(new_asset(1), vec![value(10, "100")])
            .await
            .unwrap();

        let err = repo.delete_with_details(asset.id, 2).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(details_of(&pool, asset.id).len(), 1);
    }

    #[tokio::test]
    async fn failed_create_rolls_back_the_asset_row() {
        let (_, repo, _pool, _dir) = setup().await;

        // field 999 violates the foreign key, so the whole job must roll back
        let result = repo
            .create_with_details(new_asset(1), vec![value(999, "x")])
            .await;
        assert!(result.is_err());
        assert!(repo.list_details_for_user(1).unwrap().is_empty());
    }
}
