//! Asset repository and service traits.
//!
//! These traits define the contract for asset operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::assets_model::{
    AssetField, AssetSubType, AssetType, AssetTypeListing, CreateManualAssetRequest,
    FieldUpdateSummary, FieldValue, FormData, FormDataRequest, ManualAssetCreation,
    ManualAssetDetail, ManualAssetUpdate, ManualAssetWithValues, NewUserManualAsset,
    UpdateManualAssetRequest, UserManualAsset,
};
use crate::errors::Result;

/// Read access to the asset type/subtype/field catalog.
pub trait AssetCatalogRepositoryTrait: Send + Sync {
    /// Lists all asset types ordered by id.
    fn list_asset_types(&self) -> Result<Vec<AssetType>>;

    /// Lists subtypes, restricted to one asset type when `asset_type_id` is set.
    fn list_sub_types(&self, asset_type_id: Option<i32>) -> Result<Vec<AssetSubType>>;

    /// Lists the fields of a (type, subtype) pair ordered by `order_id`.
    fn list_fields(&self, asset_type_id: i32, asset_sub_id: i32) -> Result<Vec<AssetField>>;
}

/// Persistence of manual assets and their field values.
///
/// Write methods run as a single transaction each.
#[async_trait]
pub trait ManualAssetRepositoryTrait: Send + Sync {
    /// Retrieves an asset if it exists and belongs to `user_id`.
    fn get_for_user(&self, asset_id: i32, user_id: i32) -> Result<Option<UserManualAsset>>;

    /// Retrieves an asset owned by `user_id` together with its ordered values.
    fn get_with_values(&self, asset_id: i32, user_id: i32)
        -> Result<Option<ManualAssetWithValues>>;

    /// Lists all assets of a user with names, values and institution.
    fn list_details_for_user(&self, user_id: i32) -> Result<Vec<ManualAssetDetail>>;

    /// Returns true when the linked institution (PlaidItem) belongs to `user_id`.
    fn institution_belongs_to(&self, plaid_item_id: i32, user_id: i32) -> Result<bool>;

    /// Creates the asset row and one detail row per field value.
    async fn create_with_details(
        &self,
        new_asset: NewUserManualAsset,
        field_data: Vec<FieldValue>,
    ) -> Result<UserManualAsset>;

    /// Updates existing values and inserts missing ones.
    ///
    /// A missing value is only inserted when its field belongs to the asset's
    /// (type, subtype) schema; otherwise it is counted as skipped.
    async fn apply_field_values(
        &self,
        asset: UserManualAsset,
        field_data: Vec<FieldValue>,
    ) -> Result<FieldUpdateSummary>;

    /// Deletes the asset's values and then the asset. Returns the number of
    /// value rows removed.
    async fn delete_with_details(&self, asset_id: i32, user_id: i32) -> Result<usize>;
}

/// Asset service operations exposed to the HTTP layer.
#[async_trait]
pub trait AssetServiceTrait: Send + Sync {
    /// Lists the asset type catalog with default subtype slots.
    fn get_assets_lists(&self) -> Result<Vec<AssetTypeListing>>;

    /// Lists the subtypes of an asset type.
    fn get_all_assets_sub_types(&self, asset_type_id: Option<i32>) -> Result<Vec<AssetSubType>>;

    /// Returns the form schema for an existing asset or a (type, subtype) pair.
    fn get_form_data(&self, request: FormDataRequest, user_id: i32) -> Result<FormData>;

    /// Lists a user's manual assets with their values.
    fn get_asset_details(&self, user_id: i32) -> Result<Vec<ManualAssetDetail>>;

    /// Creates a manual asset from submitted form values.
    async fn add_user_asset_details(
        &self,
        request: CreateManualAssetRequest,
        user_id: i32,
    ) -> Result<ManualAssetCreation>;

    /// Updates field values of a user's manual asset.
    async fn update_user_asset_details(
        &self,
        request: UpdateManualAssetRequest,
        user_id: i32,
    ) -> Result<ManualAssetUpdate>;

    /// Deletes a user's manual asset together with its values.
    async fn delete_manual_asset(&self, user_id: i32, asset_id: i32) -> Result<()>;
}
