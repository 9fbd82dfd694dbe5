// ABOUTME: Equipment image handlers: list the image directory and serve individual image files.
// ABOUTME: Listing answers with the ImageListing JSON shape shared with the image client.

use std::path::Path;

use axum::Json;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use biomedic_core::images::{ImageListing, is_image_file};

use crate::app_state::SharedState;
use crate::static_files::{file_response, resolve_under, text_response};

/// File names in `dir` with a recognised image extension, sorted.
pub async fn read_image_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_image_file(&name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// /api/images - List image file names in the image directory.
pub async fn list_images(State(state): State<SharedState>) -> Response {
    match read_image_names(&state.images_dir).await {
        Ok(images) => {
            tracing::debug!("listed {} images", images.len());
            Json(ImageListing::success(images)).into_response()
        }
        Err(e) => {
            tracing::error!(
                "failed to read image directory {}: {}",
                state.images_dir.display(),
                e
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ImageListing::failure("Error reading images")),
            )
                .into_response()
        }
    }
}

/// /images/equipos/{name} - Serve one image file.
pub async fn serve_image(
    State(state): State<SharedState>,
    UrlPath(name): UrlPath<String>,
) -> Response {
    let Some(path) = resolve_under(&state.images_dir, &name) else {
        tracing::warn!("refusing image path outside image directory: {}", name);
        return text_response(StatusCode::NOT_FOUND, "Image not found");
    };

    file_response(&path, "Image not found", "Error reading image").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn read_image_names_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.webp", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.png.d")).unwrap();

        let names = read_image_names(dir.path()).await.unwrap();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.webp"]);
    }

    #[tokio::test]
    async fn read_image_names_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(read_image_names(&dir.path().join("missing")).await.is_err());
    }
}
