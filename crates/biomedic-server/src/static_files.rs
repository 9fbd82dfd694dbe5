// ABOUTME: Static file serving: resolves request paths under a root directory and answers with a fixed MIME table.
// ABOUTME: Paths that try to climb out of the root are refused with 404.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::app_state::SharedState;

pub const INDEX_FILE: &str = "index.html";

/// Content type for a file, chosen from its extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Join a slash-separated request path onto `base`.
///
/// Returns `None` when any segment is `..` or carries a backslash.
pub fn resolve_under(base: &Path, relative: &str) -> Option<PathBuf> {
    let mut resolved = base.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => resolved.push(s),
        }
    }
    Some(resolved)
}

pub(crate) fn text_response(status: StatusCode, body: &'static str) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], body).into_response()
}

/// Read `path` and answer with its bytes, or a plain-text 404/500.
pub(crate) async fn file_response(
    path: &Path,
    not_found: &'static str,
    read_failed: &'static str,
) -> Response {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return text_response(StatusCode::NOT_FOUND, not_found),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("no file at {}", path.display());
            return text_response(StatusCode::NOT_FOUND, not_found);
        }
        Err(e) => {
            tracing::error!("failed to stat {}: {}", path.display(), e);
            return text_response(StatusCode::INTERNAL_SERVER_ERROR, read_failed);
        }
    }

    match tokio::fs::read(path).await {
        Ok(bytes) => ([(CONTENT_TYPE, content_type_for(path))], bytes).into_response(),
        Err(e) => {
            tracing::error!("failed to read {}: {}", path.display(), e);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, read_failed)
        }
    }
}

/// Fallback handler: serve any path under the static root, `/` as `index.html`.
pub async fn serve_static(State(state): State<SharedState>, uri: Uri) -> Response {
    let request_path = match uri.path() {
        "/" => INDEX_FILE,
        other => other,
    };

    let Some(path) = resolve_under(&state.root, request_path) else {
        tracing::warn!("refusing path outside static root: {}", uri.path());
        return text_response(StatusCode::NOT_FOUND, "File not found");
    };

    file_response(&path, "File not found", "Internal server error").await
}
