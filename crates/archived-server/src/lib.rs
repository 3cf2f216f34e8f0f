//! HTTP server for the item archive.
//!
//! Exposes Read, Create, Move, Delete and Search as JSON `POST` endpoints
//! over a directory-backed [`archived_store::Archive`], plus a `GET` endpoint
//! for raw entry images. Store errors come back as
//! [`archived_protocol::ErrorBody`] with a matching status code.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::ArchiveServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    use archived_protocol::endpoints;
    use archived_store::Archive;

    fn app() -> (TempDir, Router) {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("archive.container");
        std::fs::create_dir(&root).unwrap();
        let router = build_router(Archive::open(root).unwrap(), 1024 * 1024);
        (tmp, router)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (_tmp, app) = app();
        assert_eq!(get(&app, endpoints::HEALTH).await.status(), 200);
        assert_eq!(get(&app, endpoints::INFO).await.status(), 200);
    }

    #[tokio::test]
    async fn create_then_read() {
        let (_tmp, app) = app();
        let (status, _) = post(
            &app,
            endpoints::CREATE,
            json!({
                "metadata": {"id": "pantry", "description": "shelves"},
                "createContainer": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = post(
            &app,
            endpoints::CREATE,
            json!({
                "metadata": {"id": "apple", "tags": ["fruit"], "image": [1, 2, 3], "imageFormat": 1},
                "path": ["pantry.container"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post(&app, endpoints::READ, json!({"path": ["pantry.container"]})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["id"], "pantry");
        assert_eq!(body["metadata"]["description"], "shelves");
        assert_eq!(body["children"]["itemNames"], json!(["apple.fruit.item"]));
        assert_eq!(body["children"]["containerNames"], json!([]));

        let (_, body) = post(
            &app,
            endpoints::READ,
            json!({"path": ["pantry.container", "apple.fruit.item"]}),
        )
        .await;
        assert_eq!(body["metadata"]["tags"], json!(["fruit"]));
        assert_eq!(body["metadata"]["image"], json!([1, 2, 3]));
        assert_eq!(body["metadata"]["imageFormat"], 1);
        assert!(body.get("children").is_none());
    }

    #[tokio::test]
    async fn read_root_with_empty_body() {
        let (_tmp, app) = app();
        let (status, body) = post(&app, endpoints::READ, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["id"], "archive");
        assert_eq!(body["children"]["itemNames"], json!([]));
    }

    #[tokio::test]
    async fn read_missing_is_404() {
        let (_tmp, app) = app();
        let (status, body) = post(&app, endpoints::READ, json!({"path": ["ghost.item"]})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["message"], "not found: ghost.item");
    }

    #[tokio::test]
    async fn move_into_own_subtree_is_400() {
        let (tmp, app) = app();
        post(&app, endpoints::CREATE, json!({"metadata": {"id": "box"}, "createContainer": true})).await;

        let (status, body) = post(
            &app,
            endpoints::MOVE,
            json!({"src": ["box.container"], "dest": ["box.container", "box.container"]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "move_into_self");
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains(tmp.path().to_str().unwrap()));
    }

    #[tokio::test]
    async fn duplicate_create_is_409() {
        let (_tmp, app) = app();
        let req = json!({"metadata": {"id": "apple"}});
        assert_eq!(post(&app, endpoints::CREATE, req.clone()).await.0, StatusCode::OK);
        let (status, body) = post(&app, endpoints::CREATE, req).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "already_exists");
    }

    #[tokio::test]
    async fn invalid_image_format_is_400() {
        let (_tmp, app) = app();
        let (status, body) = post(
            &app,
            endpoints::CREATE,
            json!({"metadata": {"id": "apple", "image": [1], "imageFormat": 7}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_image_format");

        let (status, _) = post(&app, endpoints::READ, json!({"path": ["apple.item"]})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn move_delete_and_search() {
        let (_tmp, app) = app();
        post(&app, endpoints::CREATE, json!({"metadata": {"id": "box"}, "createContainer": true})).await;
        post(&app, endpoints::CREATE, json!({"metadata": {"id": "apple", "tags": ["fruit"]}})).await;
        post(&app, endpoints::CREATE, json!({"metadata": {"id": "carrot", "tags": ["vegetable"]}})).await;

        let (status, _) = post(
            &app,
            endpoints::MOVE,
            json!({"src": ["apple.fruit.item"], "dest": ["box.container", "apple.fruit.item"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post(&app, endpoints::SEARCH, json!({"query": "fruit"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["entries"],
            json!([{
                "path": ["box.container", "apple.fruit.item"],
                "meta": {"id": "apple", "tags": ["fruit"], "description": ""}
            }])
        );

        let (status, _) = post(&app, endpoints::DELETE, json!({"path": ["box.container"]})).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = post(&app, endpoints::SEARCH, json!({"query": "fruit"})).await;
        assert_eq!(body["entries"], json!([]));

        let (status, body) = post(&app, endpoints::DELETE, json!({"path": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "root_path");
    }

    #[tokio::test]
    async fn image_endpoint() {
        let (_tmp, app) = app();
        post(
            &app,
            endpoints::CREATE,
            json!({"metadata": {"id": "logo", "image": [60, 115, 118, 103, 47, 62], "imageFormat": 3}}),
        )
        .await;
        post(&app, endpoints::CREATE, json!({"metadata": {"id": "plain"}})).await;

        let response = get(&app, "/v1/image?path=logo.item").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/svg+xml");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<svg/>");

        let response = get(&app, "/v1/image?path=plain.item").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
