use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use archived_protocol::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, HealthResponse, MoveRequest,
    MoveResponse, ReadRequest, ReadResponse, SearchRequest, SearchResponse, PROTOCOL_VERSION,
};
use archived_store::{Archive, StoreResult};

use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Run a store call on the blocking pool. The store does plain filesystem
/// I/O and must not run on the async workers. Error paths are reported
/// relative to the archive root.
async fn with_archive<T, F>(state: AppState, f: F) -> ServerResult<T>
where
    F: FnOnce(&Archive) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let archive = state.archive;
    let root = archive.root().to_path_buf();
    tokio::task::spawn_blocking(move || f(&archive))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| ServerError::from(e.relative_to(&root)))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "archived-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": PROTOCOL_VERSION,
    }))
}

pub async fn read_handler(
    State(state): State<AppState>,
    Json(req): Json<ReadRequest>,
) -> ServerResult<Json<ReadResponse>> {
    let result = with_archive(state, move |archive| archive.read(&req.path)).await?;
    Ok(Json(result.into()))
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> ServerResult<Json<CreateResponse>> {
    let (parent, metadata) = req.into_parts()?;
    let created = with_archive(state, move |archive| archive.create(&parent, &metadata)).await?;
    tracing::info!(path = ?created, "entry created");
    Ok(Json(CreateResponse {}))
}

pub async fn move_handler(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> ServerResult<Json<MoveResponse>> {
    tracing::info!(src = ?req.src, dest = ?req.dest, "moving entry");
    with_archive(state, move |archive| archive.move_entry(&req.src, &req.dest)).await?;
    Ok(Json(MoveResponse {}))
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> ServerResult<Json<DeleteResponse>> {
    tracing::info!(path = ?req.path, "deleting entry");
    with_archive(state, move |archive| archive.delete(&req.path)).await?;
    Ok(Json(DeleteResponse {}))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> ServerResult<Json<SearchResponse>> {
    let hits = with_archive(state, move |archive| Ok(archive.search(&req.query))).await?;
    Ok(Json(hits.into_iter().collect()))
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    /// Archive path with segments joined by `/`.
    #[serde(default)]
    pub path: String,
}

/// Raw image bytes of an entry, served with the image's MIME type.
pub async fn image_handler(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> ServerResult<Response> {
    let segments: Vec<String> = query
        .path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let result = with_archive(state, move |archive| archive.read(&segments)).await?;
    let image = result
        .metadata
        .image
        .ok_or_else(|| ServerError::NoImage(query.path))?;

    Ok(([(header::CONTENT_TYPE, image.format.mime_type())], image.data).into_response())
}
