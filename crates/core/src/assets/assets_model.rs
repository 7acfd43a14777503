//! Asset domain models: the type/subtype/field catalog and user-declared
//! manual assets with their field values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Top-level asset category (e.g. "Vehicle").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "hasSubType")]
    pub has_sub_type: bool,
}

/// Subtype of an asset type (e.g. "Car" under "Vehicle").
///
/// Types without subtypes still own exactly one synthetic subtype so that
/// every field and every manual asset can reference a (type, subtype) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetSubType {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Owning asset type id.
    pub asset_id: i32,
}

/// Compact `{id, name}` reference to a subtype.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetSubTypeRef {
    pub id: i32,
    pub name: String,
}

/// An asset type as returned by the catalog listing.
///
/// `asset_sub_type` is the default subtype slot for types without subtypes,
/// and always `None` for types that have real subtypes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetTypeListing {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "hasSubType")]
    pub has_sub_type: bool,
    #[serde(rename = "assetSubType")]
    pub asset_sub_type: Option<AssetSubTypeRef>,
}

impl AssetTypeListing {
    /// Builds the listing entry for `asset_type` from its subtypes.
    ///
    /// Subtypes of other types are ignored; the first matching subtype becomes
    /// the default slot when the type has no subtypes of its own.
    pub fn from_type(asset_type: AssetType, sub_types: &[AssetSubType]) -> Self {
        let asset_sub_type = if asset_type.has_sub_type {
            None
        } else {
            sub_types
                .iter()
                .find(|s| s.asset_id == asset_type.id)
                .map(|s| AssetSubTypeRef {
                    id: s.id,
                    name: s.name.clone(),
                })
        };

        Self {
            id: asset_type.id,
            name: asset_type.name,
            description: asset_type.description,
            has_sub_type: asset_type.has_sub_type,
            asset_sub_type,
        }
    }
}

/// Schema of one form input for a (type, subtype) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetField {
    pub id: i32,
    pub label: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// Enumerated choices for select-style fields.
    pub options: Option<Vec<String>>,
    pub mandatory: bool,
    pub order_id: i32,
    pub asset_type_id: i32,
    pub asset_sub_id: i32,
}

/// A user-owned manual asset. Parent of its field values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserManualAsset {
    pub id: i32,
    pub user_id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    pub account_id: Option<String>,
    /// Linked institution (PlaidItem id), if any.
    pub ins_id: Option<i32>,
}

/// Input model for inserting a manual asset row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUserManualAsset {
    pub user_id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    pub account_id: Option<String>,
    pub ins_id: Option<i32>,
}

/// A stored field value of a manual asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserAssetDetail {
    pub id: i32,
    pub asset_id: i32,
    pub field_id: i32,
    pub value: String,
}

/// A field value submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub field_id: i32,
    pub value: String,
}

/// Request to create a manual asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateManualAssetRequest {
    pub asset_type_id: i32,
    pub asset_sub_id: i32,
    #[serde(rename = "fieldData", default)]
    pub field_data: Vec<FieldValue>,
    pub account_id: Option<String>,
    /// PlaidItem id of the institution this asset is held at.
    pub item_id: Option<i32>,
}

impl CreateManualAssetRequest {
    pub fn validate(&self) -> Result<()> {
        if self.asset_type_id <= 0 {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset_type_id".to_string(),
            )));
        }
        if self.asset_sub_id <= 0 {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset_sub_id".to_string(),
            )));
        }
        ensure_unique_field_ids(&self.field_data)
    }
}

/// Request to change field values of an existing manual asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateManualAssetRequest {
    pub asset_id: i32,
    #[serde(rename = "fieldData", default)]
    pub field_data: Vec<FieldValue>,
}

impl UpdateManualAssetRequest {
    pub fn validate(&self) -> Result<()> {
        if self.asset_id <= 0 {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset_id".to_string(),
            )));
        }
        ensure_unique_field_ids(&self.field_data)
    }
}

fn ensure_unique_field_ids(field_data: &[FieldValue]) -> Result<()> {
    let mut seen = HashSet::new();
    for field in field_data {
        if !seen.insert(field.field_id) {
            return Err(Error::invalid_input(format!(
                "Duplicate field id {} in fieldData",
                field.field_id
            )));
        }
    }
    Ok(())
}

/// Selects which form schema to return: either the schema of an existing
/// asset, or the schema of an explicit (type, subtype) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDataRequest {
    pub asset_id: Option<i32>,
    pub asset_subtype_id: Option<i32>,
    pub asset_type_id: Option<i32>,
}

/// Field metadata attached to a stored value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetFieldSummary {
    pub id: i32,
    pub label: String,
    pub order_id: i32,
}

/// A stored value together with the field it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetFieldValue {
    pub field_id: i32,
    pub value: String,
    pub asset_field: AssetFieldSummary,
}

/// A manual asset with its values ordered by field `order_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualAssetWithValues {
    pub id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    pub asset_fields: Vec<AssetFieldValue>,
}

/// Form schema plus the asset being edited (if any).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormData {
    #[serde(rename = "formData")]
    pub form_data: Vec<AssetField>,
    #[serde(rename = "userManualAsset")]
    pub user_manual_asset: Option<ManualAssetWithValues>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameRef {
    pub name: String,
}

/// Institution a manual asset is held at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstitutionRef {
    pub ins_name: Option<String>,
    pub ins_id: Option<String>,
}

/// A manual asset as listed on the user's asset overview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualAssetDetail {
    pub id: i32,
    pub asset_type_id: i32,
    pub asset_subtype_id: i32,
    #[serde(rename = "AssetType")]
    pub asset_type: Option<NameRef>,
    #[serde(rename = "AssetSubType")]
    pub asset_sub_type: Option<NameRef>,
    pub asset_fields: Vec<AssetFieldValue>,
    #[serde(rename = "Institution")]
    pub institution: Option<InstitutionRef>,
    pub account_id: Option<String>,
}

/// Counts of rows touched by a field-value update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldUpdateSummary {
    pub updated: usize,
    pub inserted: usize,
    /// Values dropped because their field no longer matches the asset's schema.
    pub skipped: usize,
}

/// Outcome of a create request.
///
/// Unknown field ids are a normal outcome rather than an error: the request
/// is rejected without writes and the offending ids are reported back.
#[derive(Debug, Clone, PartialEq)]
pub enum ManualAssetCreation {
    Created(UserManualAsset),
    InvalidFields(Vec<i32>),
}

/// Outcome of an update request. Unknown field ids are reported the same
/// way as on creation.
#[derive(Debug, Clone, PartialEq)]
pub enum ManualAssetUpdate {
    Updated {
        asset_id: i32,
        summary: FieldUpdateSummary,
    },
    InvalidFields(Vec<i32>),
}

/// Returns the ids in `field_data` that are not part of `schema`, in
/// submission order.
pub fn invalid_field_ids(schema: &[AssetField], field_data: &[FieldValue]) -> Vec<i32> {
    let known: HashSet<i32> = schema.iter().map(|f| f.id).collect();
    field_data
        .iter()
        .map(|f| f.field_id)
        .filter(|field_id| !known.contains(field_id))
        .collect()
}
