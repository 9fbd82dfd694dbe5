// ABOUTME: HTTP client for the /api/images endpoint, used to populate the image picker.
// ABOUTME: A failed listing is reported as an error; load_picker logs it and leaves the picker empty.

use biomedic_core::images::{ImageListing, ImagePicker};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageClientError {
    #[error("image list request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server could not list images: {0}")]
    Listing(String),
}

fn listing_url(base_url: &str) -> String {
    format!("{}/api/images", base_url.trim_end_matches('/'))
}

async fn fetch_listing(base_url: &str) -> Result<ImageListing, reqwest::Error> {
    reqwest::get(listing_url(base_url)).await?.json().await
}

/// Fetch the available image file names from a running server.
pub async fn fetch_image_list(base_url: &str) -> Result<Vec<String>, ImageClientError> {
    let listing = fetch_listing(base_url).await?;
    if listing.ok {
        Ok(listing.images.unwrap_or_default())
    } else {
        Err(ImageClientError::Listing(listing.message.unwrap_or_default()))
    }
}

/// Populate `picker` from the server. Returns whether images were loaded.
pub async fn load_picker(picker: &mut ImagePicker, base_url: &str) -> bool {
    match fetch_listing(base_url).await {
        Ok(listing) => {
            let ok = listing.ok;
            picker.populate(listing);
            ok
        }
        Err(e) => {
            tracing::error!("failed to load image list from {}: {}", base_url, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::routes::create_router;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn spawn_server(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(Arc::new(state));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn listing_url_tolerates_trailing_slash() {
        assert_eq!(listing_url("http://x:1/"), "http://x:1/api/images");
        assert_eq!(listing_url("http://x:1"), "http://x:1/api/images");
    }

    #[tokio::test]
    async fn fetches_and_populates_picker() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pump.png"), b"x").unwrap();
        std::fs::write(dir.path().join("ecg.jpg"), b"x").unwrap();
        let base = spawn_server(AppState::new(
            dir.path().to_path_buf(),
            dir.path().to_path_buf(),
        ))
        .await;

        let names = fetch_image_list(&base).await.unwrap();
        assert_eq!(names, vec!["ecg.jpg", "pump.png"]);

        let mut picker = ImagePicker::new();
        assert!(load_picker(&mut picker, &base).await);
        assert!(picker.is_loaded());
        assert_eq!(picker.select("pump.png"), "/images/equipos/pump.png");
    }

    #[tokio::test]
    async fn listing_failure_surfaces_message() {
        let dir = TempDir::new().unwrap();
        let base = spawn_server(AppState::new(
            dir.path().to_path_buf(),
            dir.path().join("missing"),
        ))
        .await;

        let err = fetch_image_list(&base).await.unwrap_err();
        assert!(matches!(err, ImageClientError::Listing(_)));

        let mut picker = ImagePicker::new();
        assert!(!load_picker(&mut picker, &base).await);
        assert!(!picker.is_loaded());
    }
}
