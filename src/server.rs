//! Embedded HTTP file-access API.
//!
//! Exposes the same confined root the TUI browses, so any HTTP client (a
//! browser, `curl`, a media player scrubbing with range requests) can list
//! directories and stream file bytes. Handlers hold no shared mutable state;
//! every request is an independent filesystem read.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::fs::{stream, FileAccess};

#[derive(Debug, Deserialize)]
struct PathQuery {
    path: Option<String>,
}

/// Build the API router over one confined root.
pub fn router(access: FileAccess) -> Router {
    let cors = CorsLayer::new().allow_methods([Method::GET]).allow_origin(Any);
    Router::new()
        .route("/api/list", get(list_handler))
        .route("/api/file", get(file_handler))
        .route("/api/root", get(root_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(access)
}

/// Bind and serve the API until the process exits.
pub async fn serve(access: FileAccess, addr: SocketAddr) -> Result<()> {
    let app = router(access);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// All service failures surface as a structured 400 with a message.
fn error_response(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

async fn list_handler(
    State(access): State<FileAccess>,
    Query(query): Query<PathQuery>,
) -> Response {
    let vpath = query.path.unwrap_or_else(|| "/".to_string());
    match access.list(&vpath).await {
        Ok(listing) => Json(listing).into_response(),
        Err(e) => error_response(&e.to_string()),
    }
}

async fn root_handler(State(access): State<FileAccess>) -> Response {
    Json(json!({ "root": access.root().display().to_string() })).into_response()
}

async fn file_handler(
    State(access): State<FileAccess>,
    Query(query): Query<PathQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(vpath) = query.path else {
        return error_response("path is required");
    };
    let (abs, size) = match access.file_meta(&vpath).await {
        Ok(meta) => meta,
        Err(e) => return error_response(&e.to_string()),
    };
    let mime = mime_guess::from_path(&abs).first_or_octet_stream().to_string();

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    match stream::resolve_range(range_header, size) {
        Some(range) => {
            let reader = match stream::open_slice(&abs, range).await {
                Ok(reader) => reader,
                Err(e) => return error_response(&e.to_string()),
            };
            (
                StatusCode::PARTIAL_CONTENT,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CONTENT_LENGTH, range.len().to_string()),
                    (
                        header::CONTENT_RANGE,
                        format!("bytes {}-{}/{}", range.start, range.end, size),
                    ),
                    (header::ACCEPT_RANGES, "bytes".to_string()),
                ],
                Body::from_stream(ReaderStream::new(reader)),
            )
                .into_response()
        }
        None => {
            let file = match tokio::fs::File::open(&abs).await {
                Ok(file) => file,
                Err(e) => return error_response(&e.to_string()),
            };
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CONTENT_LENGTH, size.to_string()),
                ],
                Body::from_stream(ReaderStream::new(file)),
            )
                .into_response()
        }
    }
}
