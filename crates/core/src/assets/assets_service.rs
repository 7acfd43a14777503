use log::{debug, info};
use std::sync::Arc;

use super::assets_model::{
    invalid_field_ids, AssetSubType, AssetTypeListing, CreateManualAssetRequest, FieldValue,
    FormData, FormDataRequest, ManualAssetCreation, ManualAssetDetail, ManualAssetUpdate,
    NewUserManualAsset, UpdateManualAssetRequest,
};
use super::assets_traits::{
    AssetCatalogRepositoryTrait, AssetServiceTrait, ManualAssetRepositoryTrait,
};
use crate::errors::{Error, Result, ValidationError};
use crate::users::UserRepositoryTrait;

/// Service for the asset catalog and user-declared manual assets
pub struct AssetService {
    catalog_repository: Arc<dyn AssetCatalogRepositoryTrait>,
    manual_asset_repository: Arc<dyn ManualAssetRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl AssetService {
    /// Creates a new AssetService instance
    pub fn new(
        catalog_repository: Arc<dyn AssetCatalogRepositoryTrait>,
        manual_asset_repository: Arc<dyn ManualAssetRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            catalog_repository,
            manual_asset_repository,
            user_repository,
        }
    }

    fn ensure_user_exists(&self, user_id: i32) -> Result<()> {
        match self.user_repository.get_by_id(user_id)? {
            Some(_) => Ok(()),
            None => Err(Error::invalid_input("User not found")),
        }
    }

    fn ensure_institution_owned(&self, item_id: Option<i32>, user_id: i32) -> Result<()> {
        let Some(item_id) = item_id else {
            return Ok(());
        };
        if self
            .manual_asset_repository
            .institution_belongs_to(item_id, user_id)?
        {
            Ok(())
        } else {
            debug!(
                "Rejecting manual asset for user {}: institution {} is not theirs",
                user_id, item_id
            );
            Err(Error::invalid_input("Invalid institution id"))
        }
    }
}

#[async_trait::async_trait]
impl AssetServiceTrait for AssetService {
    fn get_assets_lists(&self) -> Result<Vec<AssetTypeListing>> {
        let asset_types = self.catalog_repository.list_asset_types()?;
        let sub_types = self.catalog_repository.list_sub_types(None)?;

        Ok(asset_types
            .into_iter()
            .map(|asset_type| AssetTypeListing::from_type(asset_type, &sub_types))
            .collect())
    }

    fn get_all_assets_sub_types(&self, asset_type_id: Option<i32>) -> Result<Vec<AssetSubType>> {
        let asset_type_id = asset_type_id
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::invalid_input("Asset id not found"))?;
        self.catalog_repository.list_sub_types(Some(asset_type_id))
    }

    fn get_form_data(&self, request: FormDataRequest, user_id: i32) -> Result<FormData> {
        self.ensure_user_exists(user_id)?;

        // An asset id of 0 means "no asset": fall back to the supplied type/subtype.
        let user_manual_asset = match request.asset_id.filter(|id| *id > 0) {
            Some(asset_id) => Some(
                self.manual_asset_repository
                    .get_with_values(asset_id, user_id)?
                    .ok_or_else(|| Error::NotFound("Invalid Asset ID".to_string()))?,
            ),
            None => None,
        };

        let (asset_type_id, asset_sub_id) = match &user_manual_asset {
            Some(asset) => (asset.asset_type_id, asset.asset_subtype_id),
            None => (
                request.asset_type_id.ok_or_else(|| {
                    Error::Validation(ValidationError::MissingField("asset_type_id".into()))
                })?,
                request.asset_subtype_id.ok_or_else(|| {
                    Error::Validation(ValidationError::MissingField("asset_subtype_id".into()))
                })?,
            ),
        };

        let form_data = self
            .catalog_repository
            .list_fields(asset_type_id, asset_sub_id)?;

        Ok(FormData {
            form_data,
            user_manual_asset,
        })
    }

    fn get_asset_details(&self, user_id: i32) -> Result<Vec<ManualAssetDetail>> {
        self.manual_asset_repository.list_details_for_user(user_id)
    }

    async fn add_user_asset_details(
        &self,
        request: CreateManualAssetRequest,
        user_id: i32,
    ) -> Result<ManualAssetCreation> {
        request.validate()?;
        self.ensure_user_exists(user_id)?;
        self.ensure_institution_owned(request.item_id, user_id)?;

        let schema = self
            .catalog_repository
            .list_fields(request.asset_type_id, request.asset_sub_id)?;
        let wrong_ids = invalid_field_ids(&schema, &request.field_data);
        if !wrong_ids.is_empty() {
            debug!(
                "Rejecting manual asset for user {}: invalid field ids {:?}",
                user_id, wrong_ids
            );
            return Ok(ManualAssetCreation::InvalidFields(wrong_ids));
        }

        let new_asset = NewUserManualAsset {
            user_id,
            asset_type_id: request.asset_type_id,
            asset_subtype_id: request.asset_sub_id,
            account_id: request.account_id,
            ins_id: request.item_id,
        };
        let asset = self
            .manual_asset_repository
            .create_with_details(new_asset, request.field_data)
            .await?;

        info!("Created manual asset {} for user {}", asset.id, user_id);
        Ok(ManualAssetCreation::Created(asset))
    }

    async fn update_user_asset_details(
        &self,
        request: UpdateManualAssetRequest,
        user_id: i32,
    ) -> Result<ManualAssetUpdate> {
        request.validate()?;

        let asset = self
            .manual_asset_repository
            .get_for_user(request.asset_id, user_id)?
            .ok_or_else(|| {
                Error::NotFound(format!("Asset not found with id : {}", request.asset_id))
            })?;

        let schema = self
            .catalog_repository
            .list_fields(asset.asset_type_id, asset.asset_subtype_id)?;
        let wrong_ids = invalid_field_ids(&schema, &request.field_data);
        if !wrong_ids.is_empty() {
            return Ok(ManualAssetUpdate::InvalidFields(wrong_ids));
        }

        let field_data: Vec<FieldValue> = request
            .field_data
            .into_iter()
            .map(|f| FieldValue {
                field_id: f.field_id,
                value: f.value.trim().to_string(),
            })
            .collect();

        let asset_id = asset.id;
        let summary = self
            .manual_asset_repository
            .apply_field_values(asset, field_data)
            .await?;

        debug!(
            "Updated manual asset {}: {} updated, {} inserted, {} skipped",
            asset_id, summary.updated, summary.inserted, summary.skipped
        );
        Ok(ManualAssetUpdate::Updated { asset_id, summary })
    }

    async fn delete_manual_asset(&self, user_id: i32, asset_id: i32) -> Result<()> {
        if self
            .manual_asset_repository
            .get_for_user(asset_id, user_id)?
            .is_none()
        {
            return Err(Error::invalid_input("Invalid Asset ID"));
        }

        let removed_values = self
            .manual_asset_repository
            .delete_with_details(asset_id, user_id)
            .await?;
        info!(
            "Deleted manual asset {} ({} values) for user {}",
            asset_id, removed_values, user_id
        );
        Ok(())
    }
}
