//! Tests for asset domain models.

use super::assets_model::*;

fn asset_type(id: i32, has_sub_type: bool) -> AssetType {
    AssetType {
        id,
        name: format!("Type {}", id),
        description: None,
        has_sub_type,
    }
}

fn sub_type(id: i32, asset_id: i32) -> AssetSubType {
    AssetSubType {
        id,
        name: format!("Sub {}", id),
        description: None,
        asset_id,
    }
}

fn field(id: i32, order_id: i32) -> AssetField {
    AssetField {
        id,
        label: format!("Field {}", id),
        name: format!("field_{}", id),
        field_type: "text".to_string(),
        options: None,
        mandatory: false,
        order_id,
        asset_type_id: 1,
        asset_sub_id: 2,
    }
}

#[test]
fn listing_without_subtypes_takes_first_own_subtype() {
    let subs = vec![sub_type(1, 1), sub_type(7, 3), sub_type(8, 3)];
    let listing = AssetTypeListing::from_type(asset_type(3, false), &subs);

    assert_eq!(
        listing.asset_sub_type,
        Some(AssetSubTypeRef {
            id: 7,
            name: "Sub 7".to_string()
        })
    );
}

#[test]
fn listing_without_any_subtype_is_null() {
    let listing = AssetTypeListing::from_type(asset_type(4, false), &[sub_type(1, 1)]);
    assert!(listing.asset_sub_type.is_none());
}

#[test]
fn listing_with_subtypes_never_synthesizes_a_slot() {
    let subs = vec![sub_type(1, 1), sub_type(2, 1)];
    let listing = AssetTypeListing::from_type(asset_type(1, true), &subs);
    assert!(listing.asset_sub_type.is_none());
}

#[test]
fn listing_serializes_single_object_not_array() {
    let listing = AssetTypeListing::from_type(asset_type(3, false), &[sub_type(5, 3)]);
    let json = serde_json::to_value(&listing).unwrap();

    assert_eq!(json["hasSubType"], serde_json::json!(false));
    assert!(json["assetSubType"].is_object());
    assert_eq!(json["assetSubType"]["id"], serde_json::json!(5));
}

#[test]
fn invalid_field_ids_reports_unknown_ids_in_order() {
    let schema = vec![field(10, 1), field(11, 2)];
    let data = vec![
        FieldValue {
            field_id: 12,
            value: "a".into(),
        },
        FieldValue {
            field_id: 10,
            value: "b".into(),
        },
        FieldValue {
            field_id: 3,
            value: "c".into(),
        },
    ];

    assert_eq!(invalid_field_ids(&schema, &data), vec![12, 3]);
}

#[test]
fn invalid_field_ids_empty_when_all_known() {
    let schema = vec![field(10, 1)];
    let data = vec![FieldValue {
        field_id: 10,
        value: "100".into(),
    }];
    assert!(invalid_field_ids(&schema, &data).is_empty());
}

#[test]
fn create_request_rejects_duplicate_field_ids() {
    let request = CreateManualAssetRequest {
        asset_type_id: 1,
        asset_sub_id: 2,
        field_data: vec![
            FieldValue {
                field_id: 10,
                value: "1".into(),
            },
            FieldValue {
                field_id: 10,
                value: "2".into(),
            },
        ],
        account_id: None,
        item_id: None,
    };
    assert!(request.validate().is_err());
}

#[test]
fn create_request_requires_type_and_subtype() {
    let request = CreateManualAssetRequest {
        asset_type_id: 0,
        asset_sub_id: 2,
        field_data: vec![],
        account_id: None,
        item_id: None,
    };
    let err = request.validate().unwrap_err();
    assert!(err.to_string().contains("asset_type_id"));
}

#[test]
fn create_request_reads_field_data_key() {
    let request: CreateManualAssetRequest = serde_json::from_str(
        r#"{"asset_type_id":1,"asset_sub_id":2,"fieldData":[{"field_id":10,"value":"100"}],"account_id":null,"item_id":3}"#,
    )
    .unwrap();

    assert_eq!(request.field_data.len(), 1);
    assert_eq!(request.field_data[0].value, "100");
    assert_eq!(request.item_id, Some(3));
}
