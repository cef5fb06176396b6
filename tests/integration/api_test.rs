//! Integration tests for the item API over a real socket.

mod helpers;

use reqwest::StatusCode;
use serde_json::{Value, json};

use diagramhub_core::{ErrorKind, UserId};
use diagramhub_entity::item::{CreateItem, MoveItem, RenameItem, SaveContent};
use diagramhub_storage::ItemGateway;
use diagramhub_storage::http::client::USER_ID_HEADER;

use helpers::TestServer;

fn create(parent: Option<&diagramhub_entity::item::Item>, name: &str, is_folder: bool) -> CreateItem {
    CreateItem {
        parent_id: parent.map(|p| p.id.clone()),
        name: name.to_string(),
        is_folder,
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::spawn().await;
    let response = reqwest::get(server.url("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_missing_user_header_is_unauthorized() {
    let server = TestServer::spawn().await;
    let response = reqwest::get(server.url("/api/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_create_status_and_camel_case_body() {
    let server = TestServer::spawn().await;
    let user = UserId::new();

    let response = reqwest::Client::new()
        .post(server.url("/api/items"))
        .header(USER_ID_HEADER, user.to_string())
        .json(&json!({ "parentId": null, "name": "Flow", "isFolder": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Flow.mmd");
    assert_eq!(body["isFolder"], false);
    assert!(body["parentId"].is_null());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_gateway_maps_error_kinds() {
    let server = TestServer::spawn().await;
    let gateway = server.gateway(UserId::new());

    let folder = gateway.create_item(create(None, "Designs", true)).await.unwrap();
    let child = gateway
        .create_item(create(Some(&folder), "Inner", true))
        .await
        .unwrap();

    let err = gateway
        .create_item(create(None, "Designs", true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "An item named 'Designs' already exists in this folder");

    let err = gateway
        .move_item(
            &folder.id,
            MoveItem {
                new_parent_id: Some(child.id.clone()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = gateway
        .rename_item(
            &folder.id,
            RenameItem {
                new_name: " ".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = gateway.duplicate_item(&folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_foreign_items_are_not_found() {
    let server = TestServer::spawn().await;
    let owner = server.gateway(UserId::new());
    let other = server.gateway(UserId::new());

    let file = owner.create_item(create(None, "Secret", false)).await.unwrap();

    assert!(other.list_items().await.unwrap().is_empty());
    let err = other.get_content(&file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = other.delete_item(&file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    assert_eq!(owner.list_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_cascades_over_http() {
    let server = TestServer::spawn().await;
    let gateway = server.gateway(UserId::new());

    let folder = gateway.create_item(create(None, "Root", true)).await.unwrap();
    let nested = gateway
        .create_item(create(Some(&folder), "Nested", true))
        .await
        .unwrap();
    let file = gateway
        .create_item(create(Some(&nested), "Deep", false))
        .await
        .unwrap();

    gateway.delete_item(&folder.id).await.unwrap();

    assert!(gateway.list_items().await.unwrap().is_empty());
    let err = gateway.get_content(&file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_content_history_over_http() {
    let server = TestServer::spawn().await;
    let gateway = server.gateway(UserId::new());
    let file = gateway.create_item(create(None, "Chart", false)).await.unwrap();

    for text in ["v1", "v2", "v3"] {
        gateway
            .save_content(
                &file.id,
                SaveContent {
                    content: text.to_string(),
                },
            )
            .await
            .unwrap();
    }

    assert_eq!(gateway.get_content(&file.id).await.unwrap().content, "v3");
    let versions = gateway.list_versions(&file.id).await.unwrap();
    let numbers: Vec<u32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![2, 1]);
    assert_eq!(versions[0].content, "v2");

    let copy = gateway.duplicate_item(&file.id).await.unwrap();
    assert_eq!(copy.name, "Chart copy.mmd");
    assert_eq!(gateway.get_content(&copy.id).await.unwrap().content, "v3");
}

#[tokio::test]
async fn test_cors_preflight() {
    let server = TestServer::spawn().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/api/items"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "PATCH")
        .header("access-control-request-headers", USER_ID_HEADER)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert_eq!(
        headers
            .get("access-control-max-age")
            .and_then(|v| v.to_str().ok()),
        Some("3600")
    );
}
