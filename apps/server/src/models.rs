use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use finvault_core::assets::{
    CreateManualAssetRequest, FieldValue, FormDataRequest, UpdateManualAssetRequest,
};

use crate::error::ApiResult;

/// Uniform response envelope used for successes and errors alike.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl ApiResponse {
    pub fn with_data<T: Serialize>(
        status: StatusCode,
        message: impl Into<String>,
        data: &T,
    ) -> ApiResult<Self> {
        let data = serde_json::to_value(data).map_err(|e| {
            finvault_core::Error::Unexpected(format!("Failed to serialize response: {}", e))
        })?;
        Ok(Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
        })
    }

    pub fn empty(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data: serde_json::json!({}),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            data: serde_json::json!({}),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldValueBody {
    pub field_id: i32,
    pub value: String,
}

impl From<FieldValueBody> for FieldValue {
    fn from(body: FieldValueBody) -> Self {
        FieldValue {
            field_id: body.field_id,
            value: body.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateManualAssetBody {
    pub asset_type_id: i32,
    pub asset_sub_id: i32,
    #[serde(rename = "fieldData", default)]
    pub field_data: Vec<FieldValueBody>,
    pub account_id: Option<String>,
    /// Id of the linked institution (PlaidItem).
    pub item_id: Option<i32>,
}

impl From<CreateManualAssetBody> for CreateManualAssetRequest {
    fn from(body: CreateManualAssetBody) -> Self {
        CreateManualAssetRequest {
            asset_type_id: body.asset_type_id,
            asset_sub_id: body.asset_sub_id,
            field_data: body.field_data.into_iter().map(FieldValue::from).collect(),
            account_id: body.account_id,
            item_id: body.item_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateManualAssetBody {
    pub asset_id: i32,
    #[serde(rename = "fieldData", default)]
    pub field_data: Vec<FieldValueBody>,
}

impl From<UpdateManualAssetBody> for UpdateManualAssetRequest {
    fn from(body: UpdateManualAssetBody) -> Self {
        UpdateManualAssetRequest {
            asset_id: body.asset_id,
            field_data: body.field_data.into_iter().map(FieldValue::from).collect(),
        }
    }
}

/// Selects a form schema by existing asset or by (type, subtype).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct FormDataBody {
    pub asset_id: Option<i32>,
    pub asset_subtype_id: Option<i32>,
    pub asset_type_id: Option<i32>,
}

impl From<FormDataBody> for FormDataRequest {
    fn from(body: FormDataBody) -> Self {
        FormDataRequest {
            asset_id: body.asset_id,
            asset_subtype_id: body.asset_subtype_id,
            asset_type_id: body.asset_type_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_camel_case_keys() {
        let body = ApiResponse::empty(StatusCode::CREATED, "done");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 201);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!({}));
    }

    #[test]
    fn create_body_reads_field_data_key() {
        let body: CreateManualAssetBody = serde_json::from_value(serde_json::json!({
            "asset_type_id": 1,
            "asset_sub_id": 2,
            "fieldData": [{"field_id": 10, "value": "100"}]
        }))
        .unwrap();
        let request = CreateManualAssetRequest::from(body);
        assert_eq!(request.field_data.len(), 1);
        assert_eq!(request.field_data[0].field_id, 10);
        assert!(request.item_id.is_none());
    }
}
