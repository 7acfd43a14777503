//! SQLite storage implementation for the asset catalog and manual assets.

mod model;
mod repository;

pub use model::{
    AssetFieldDB, AssetSubTypeDB, AssetTypeDB, NewUserAssetDetailDB, NewUserManualAssetDB,
    UserAssetDetailDB, UserManualAssetDB,
};
pub use repository::{AssetCatalogRepository, ManualAssetRepository};
