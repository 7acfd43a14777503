//! Database models for the asset catalog and manual assets.

use diesel::prelude::*;
use log::warn;

use finvault_core::assets::{
    AssetField, AssetSubType, AssetType, NewUserManualAsset, UserAssetDetail, UserManualAsset,
};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetTypeDB {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub has_sub_type: bool,
}

#[derive(Queryable, Identifiable, Selectable, Associations, PartialEq, Debug, Clone)]
#[diesel(belongs_to(AssetTypeDB, foreign_key = asset_id))]
#[diesel(table_name = crate::schema::asset_sub_types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetSubTypeDB {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub asset_id: i32,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_fields)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetFieldDB {
    pub id: i32,
    pub label: String,
    pub name: String,
    pub field_type: String,
    pub options: Option<String>,
    pub mandatory: bool,
    pub order_id: i32,
    pub asset_type_id: i32,
    pub asset_sub_id: i32,
}

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_manual_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserManualAssetDB {
    pub id: i32,
    pub user_id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    pub account_id: Option<String>,
    pub ins_id: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::user_manual_assets)]
pub struct NewUserManualAssetDB {
    pub user_id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    pub account_id: Option<String>,
    pub ins_id: Option<i32>,
}

#[derive(
    Queryable, Identifiable, Selectable, Associations, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(UserManualAssetDB, foreign_key = asset_id))]
#[diesel(table_name = crate::schema::user_assets_details)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserAssetDetailDB {
    pub id: i32,
    pub asset_id: i32,
    pub field_id: i32,
    pub value: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::user_assets_details)]
pub struct NewUserAssetDetailDB {
    pub asset_id: i32,
    pub field_id: i32,
    pub value: String,
}

// Conversion to domain models
impl From<AssetTypeDB> for AssetType {
    fn from(db: AssetTypeDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            has_sub_type: db.has_sub_type,
        }
    }
}

impl From<AssetSubTypeDB> for AssetSubType {
    fn from(db: AssetSubTypeDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            asset_id: db.asset_id,
        }
    }
}

impl From<AssetFieldDB> for AssetField {
    fn from(db: AssetFieldDB) -> Self {
        // Options are stored as a JSON array of strings.
        let options = db.options.as_deref().and_then(|raw| {
            serde_json::from_str::<Vec<String>>(raw)
                .map_err(|e| warn!("Ignoring malformed options of asset field {}: {}", db.id, e))
                .ok()
        });
        Self {
            id: db.id,
            label: db.label,
            name: db.name,
            field_type: db.field_type,
            options,
            mandatory: db.mandatory,
            order_id: db.order_id,
            asset_type_id: db.asset_type_id,
            asset_sub_id: db.asset_sub_id,
        }
    }
}

impl From<UserManualAssetDB> for UserManualAsset {
    fn from(db: UserManualAssetDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            asset_type_id: db.asset_type_id,
            asset_subtype_id: db.asset_subtype_id,
            account_id: db.account_id,
            ins_id: db.ins_id,
        }
    }
}

impl From<NewUserManualAsset> for NewUserManualAssetDB {
    fn from(domain: NewUserManualAsset) -> Self {
        Self {
            user_id: domain.user_id,
            asset_type_id: domain.asset_type_id,
            asset_subtype_id: domain.asset_subtype_id,
            account_id: domain.account_id,
            ins_id: domain.ins_id,
        }
    }
}

impl From<UserAssetDetailDB> for UserAssetDetail {
    fn from(db: UserAssetDetailDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            field_id: db.field_id,
            value: db.value,
        }
    }
}
