//! Assets module - catalog and manual asset models, services, and traits.

mod assets_model;
mod assets_service;
mod assets_traits;

#[cfg(test)]
mod assets_model_tests;

// Re-export the public interface
pub use assets_model::{
    invalid_field_ids, AssetField, AssetFieldSummary, AssetFieldValue, AssetSubType,
    AssetSubTypeRef, AssetType, AssetTypeListing, CreateManualAssetRequest, FieldUpdateSummary,
    FieldValue, FormData, FormDataRequest, InstitutionRef, ManualAssetCreation,
    ManualAssetDetail, ManualAssetUpdate, ManualAssetWithValues, NameRef, NewUserManualAsset,
    UpdateManualAssetRequest, UserAssetDetail, UserManualAsset,
};
pub use assets_service::AssetService;
pub use assets_traits::{
    AssetCatalogRepositoryTrait, AssetServiceTrait, ManualAssetRepositoryTrait,
};
