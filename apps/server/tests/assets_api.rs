use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use finvault_connect::PlaidConfig;
use finvault_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    _tmp: TempDir,
}

async fn spawn_app(plaid_base_url: &str) -> TestApp {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: db_path.clone(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        log_format: "text".to_string(),
        plaid: PlaidConfig::new("client-id", "secret").with_base_url(plaid_base_url),
    };
    let state = build_state(&config).await.unwrap();

    let mut conn = SqliteConnection::establish(&db_path).unwrap();
    diesel::sql_query(
        "INSERT INTO users (id, email, name) VALUES (1, 'ada@example.com', 'Ada'), (2, 'bob@example.com', NULL)",
    )
    .execute(&mut conn)
    .unwrap();
    diesel::sql_query(
        "INSERT INTO plaid_items (id, user_id, access_token, ins_name, ins_id) VALUES (7, 1, 'access-sandbox-1', 'First Platypus Bank', 'ins_109508')",
    )
    .execute(&mut conn)
    .unwrap();

    TestApp {
        router: app_router(state, &config),
        _tmp: tmp,
    }
}

async fn call(
    app: &TestApp,
    method: &str,
    uri: &str,
    user_id: Option<i32>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_works() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn requests_without_user_are_rejected_with_envelope() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(&app, "GET", "/api/v1/assets/details", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
}

#[tokio::test]
async fn type_listing_synthesizes_single_subtype() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(&app, "GET", "/api/v1/assets/types", Some(1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assets list fetched successfully");

    let types = body["data"].as_array().unwrap();
    assert_eq!(types.len(), 4);
    let vehicle = types.iter().find(|t| t["name"] == "Vehicle").unwrap();
    assert!(vehicle["assetSubType"].is_null());
    let jewelry = types.iter().find(|t| t["name"] == "Jewelry").unwrap();
    assert_eq!(jewelry["assetSubType"]["id"], 5);
}

#[tokio::test]
async fn subtypes_require_a_type_id() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(&app, "GET", "/api/v1/assets/types/1/subtypes", Some(1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = call(&app, "GET", "/api/v1/assets/types/0/subtypes", Some(1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Asset id not found");
}

#[tokio::test]
async fn manual_asset_lifecycle() {
    let app = spawn_app("http://127.0.0.1:9").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/manual",
        Some(1),
        Some(json!({
            "asset_type_id": 1,
            "asset_sub_id": 2,
            "fieldData": [{ "field_id": 10, "value": "100" }],
            "item_id": 7
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Asset created successfully");
    let asset_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        "/api/v1/assets/manual",
        Some(1),
        Some(json!({ "asset_id": asset_id, "fieldData": [{ "field_id": 10, "value": " 200 " }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 1);
    assert_eq!(body["data"]["inserted"], 0);

    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/form",
        Some(1),
        Some(json!({ "asset_id": asset_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["formData"].as_array().unwrap().len(), 5);
    let values = body["data"]["userManualAsset"]["asset_fields"].as_array().unwrap();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0]["value"], "200");

    let (_, body) = call(&app, "GET", "/api/v1/assets/details", Some(1), None).await;
    let details = body["data"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["AssetSubType"]["name"], "Motorcycle");
    assert_eq!(details[0]["Institution"]["ins_name"], "First Platypus Bank");

    let uri = format!("/api/v1/assets/manual/{}", asset_id);
    let (status, body) = call(&app, "DELETE", &uri, Some(1), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Asset deleted successfully!");

    let (_, body) = call(&app, "GET", "/api/v1/assets/details", Some(1), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = call(&app, "DELETE", &uri, Some(1), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Asset ID");
}

#[tokio::test]
async fn foreign_field_ids_are_reported_without_writes() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/manual",
        Some(1),
        Some(json!({
            "asset_type_id": 1,
            "asset_sub_id": 2,
            "fieldData": [{ "field_id": 10, "value": "1" }, { "field_id": 999, "value": "x" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Invalid Fields");
    assert_eq!(body["data"]["invalid_field_ids"], json!([999]));

    let (_, body) = call(&app, "GET", "/api/v1/assets/details", Some(1), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_foreign_institution_is_rejected() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/manual",
        Some(2),
        Some(json!({
            "asset_type_id": 1,
            "asset_sub_id": 2,
            "fieldData": [{ "field_id": 10, "value": "100" }],
            "item_id": 7
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid institution id");

    let (_, body) = call(&app, "GET", "/api/v1/assets/details", Some(2), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn form_with_zero_asset_id_uses_supplied_type() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/form",
        Some(1),
        Some(json!({ "asset_id": 0, "asset_type_id": 1, "asset_subtype_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["formData"].as_array().unwrap().len(), 5);
    assert!(body["data"]["userManualAsset"].is_null());
}

#[tokio::test]
async fn update_of_foreign_asset_is_not_found() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (_, body) = call(
        &app,
        "POST",
        "/api/v1/assets/manual",
        Some(1),
        Some(json!({ "asset_type_id": 3, "asset_sub_id": 5, "fieldData": [] })),
    )
    .await;
    let asset_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        "/api/v1/assets/manual",
        Some(2),
        Some(json!({ "asset_id": asset_id, "fieldData": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Asset not found with id : {}", asset_id));
}

#[tokio::test]
async fn malformed_json_uses_envelope() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(
        &app,
        "POST",
        "/api/v1/assets/manual",
        Some(1),
        Some(json!({ "asset_type_id": "vehicle" })),
    )
    .await;
    assert!(status.is_client_error());
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn report_token_requires_linked_items() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(&app, "POST", "/api/v1/assets/report-token", Some(2), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Access token is not generated for this user");
}

#[tokio::test]
async fn report_token_import_and_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/asset_report/create"))
        .and(body_partial_json(json!({ "access_tokens": ["access-sandbox-1"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset_report_token": "assets-sandbox-abc",
            "asset_report_id": "report-1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/asset_report/get"))
        .and(body_partial_json(json!({ "asset_report_token": "assets-sandbox-abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "report": {
                "asset_report_id": "report-1",
                "items": [{
                    "item_id": "item-1",
                    "institution_id": "ins_109508",
                    "institution_name": "First Platypus Bank",
                    "accounts": [{
                        "account_id": "acc-1",
                        "balances": { "available": 100.0, "current": 110.0, "limit": null },
                        "days_available": 365,
                        "historical_balances": [
                            { "current": 110.0, "date": "2024-03-02" },
                            { "current": 95.5, "date": "2024-03-01" }
                        ],
                        "mask": "0000",
                        "name": "Plaid Checking",
                        "subtype": "checking",
                        "type": "depository"
                    }]
                }]
            }
        })))
        .mount(&server)
        .await;

    let app = spawn_app(&server.uri()).await;

    let (status, body) = call(&app, "POST", "/api/v1/assets/report-token", Some(1), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Asset report token generated successfully");
    assert_eq!(body["data"]["items"][0]["status"], "created");

    let (_, body) = call(&app, "POST", "/api/v1/assets/report-token", Some(1), None).await;
    assert_eq!(body["data"]["items"][0]["status"], "already_exists");

    for _ in 0..2 {
        let (status, body) = call(&app, "POST", "/api/v1/assets/import", Some(1), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["status"], "imported");
        assert_eq!(body["data"]["items"][0]["accounts_upserted"], 1);
    }

    let (status, body) = call(&app, "GET", "/api/v1/assets/plaid", Some(1), None).await;
    assert_eq!(status, StatusCode::OK);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["PlaidItem"]["ins_name"], "First Platypus Bank");
    let accounts = groups[0]["AssetAccount"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["account_id"], "acc-1");
    assert_eq!(accounts[0]["type"], "depository");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app("http://127.0.0.1:9").await;
    let (status, body) = call(&app, "GET", "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/assets/manual"].is_object());
}
