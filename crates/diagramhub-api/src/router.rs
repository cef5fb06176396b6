//! Route definitions for the DiagramHub HTTP API.
//!
//! All routes are mounted under `/api`. Every item route is scoped to the
//! caller named by the `x-user-id` header.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};

use diagramhub_entity::item::validation::MAX_CONTENT_BYTES;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Largest accepted request body; leaves room for JSON escaping of content.
const MAX_BODY_BYTES: usize = MAX_CONTENT_BYTES * 4;

/// Build the Axum router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(item_routes())
        .merge(content_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Item list, create, rename, move, delete, duplicate
fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/{id}",
            patch(handlers::items::rename_item).delete(handlers::items::delete_item),
        )
        .route("/items/{id}/move", patch(handlers::items::move_item))
        .route("/items/{id}/duplicate", post(handlers::items::duplicate_item))
}

/// File content and version history
fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items/{id}/content",
            get(handlers::content::get_content).put(handlers::content::save_content),
        )
        .route("/items/{id}/versions", get(handlers::content::list_versions))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use diagramhub_core::UserId;
    use diagramhub_core::config::AppConfig;
    use diagramhub_entity::content::{FileContent, FileVersion};
    use diagramhub_entity::item::Item;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::error::ApiErrorResponse;
    use crate::extractors::USER_ID_HEADER;

    fn app() -> Router {
        build_router(AppState::new(AppConfig::default()))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn create(app: &Router, user: UserId, body: Value) -> Item {
        let (status, bytes) = send(app, Method::POST, "/api/items", Some(user), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, bytes) = send(&app(), Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_requires_user_header() {
        let (status, bytes) = send(&app(), Method::GET, "/api/items", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = app();
        let user = UserId::new();
        let folder = create(&app, user, json!({ "name": "Designs", "isFolder": true })).await;
        let file = create(
            &app,
            user,
            json!({ "parentId": folder.id, "name": "Flow", "isFolder": false }),
        )
        .await;
        assert_eq!(file.name, "Flow.mmd");
        assert_eq!(file.parent_id, Some(folder.id.clone()));

        let (status, bytes) = send(&app, Method::GET, "/api/items", Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        let items: Vec<Item> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_folder);
    }

    #[tokio::test]
    async fn test_items_are_scoped_per_user() {
        let app = app();
        let owner = UserId::new();
        let other = UserId::new();
        let file = create(&app, owner, json!({ "name": "Mine" })).await;

        let (_, bytes) = send(&app, Method::GET, "/api/items", Some(other), None).await;
        let items: Vec<Item> = serde_json::from_slice(&bytes).unwrap();
        assert!(items.is_empty());

        let uri = format!("/api/items/{}", file.id);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_and_conflict_statuses() {
        let app = app();
        let user = UserId::new();

        let (status, bytes) =
            send(&app, Method::POST, "/api/items", Some(user), Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "VALIDATION_ERROR");
        assert_eq!(body.message, "Name cannot be empty");

        let (status, _) =
            send(&app, Method::POST, "/api/items", Some(user), Some(json!({ "nope": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        create(&app, user, json!({ "name": "A" })).await;
        let (status, _) =
            send(&app, Method::POST, "/api/items", Some(user), Some(json!({ "name": "A.mmd" })))
                .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_rename_move_and_conflict() {
        let app = app();
        let user = UserId::new();
        let folder = create(&app, user, json!({ "name": "F", "isFolder": true })).await;
        let a = create(&app, user, json!({ "name": "A" })).await;
        create(&app, user, json!({ "name": "B" })).await;

        let uri = format!("/api/items/{}", a.id);
        let (status, bytes) =
            send(&app, Method::PATCH, &uri, Some(user), Some(json!({ "newName": "B" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "CONFLICT");

        let (status, _) =
            send(&app, Method::PATCH, &uri, Some(user), Some(json!({ "newName": "C" }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let move_uri = format!("/api/items/{}/move", a.id);
        let (status, _) = send(
            &app,
            Method::PATCH,
            &move_uri,
            Some(user),
            Some(json!({ "newParentId": folder.id })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, bytes) = send(&app, Method::GET, "/api/items", Some(user), None).await;
        let items: Vec<Item> = serde_json::from_slice(&bytes).unwrap();
        let moved = items.iter().find(|i| i.id == a.id).unwrap();
        assert_eq!(moved.name, "C.mmd");
        assert_eq!(moved.parent_id, Some(folder.id));
    }

    #[tokio::test]
    async fn test_content_versions_and_duplicate() {
        let app = app();
        let user = UserId::new();
        let file = create(&app, user, json!({ "name": "Chart" })).await;
        let content_uri = format!("/api/items/{}/content", file.id);

        for text in ["graph TD", "graph LR"] {
            let (status, _) = send(
                &app,
                Method::PUT,
                &content_uri,
                Some(user),
                Some(json!({ "content": text })),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, bytes) = send(&app, Method::GET, &content_uri, Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        let content: FileContent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(content.content, "graph LR");

        let versions_uri = format!("/api/items/{}/versions", file.id);
        let (_, bytes) = send(&app, Method::GET, &versions_uri, Some(user), None).await;
        let versions: Vec<FileVersion> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].content, "graph TD");

        let dup_uri = format!("/api/items/{}/duplicate", file.id);
        let (status, bytes) = send(&app, Method::POST, &dup_uri, Some(user), None).await;
        assert_eq!(status, StatusCode::CREATED);
        let copy: Item = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(copy.name, "Chart copy.mmd");
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let app = app();
        let user = UserId::new();
        let (status, bytes) =
            send(&app, Method::GET, "/api/items/missing/content", Some(user), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Item not found");
    }
}
