// ABOUTME: Shared application state for the biomedic HTTP server.
// ABOUTME: Holds the static root and image directory that handlers resolve requests against.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state accessible by all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub images_dir: PathBuf,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(root: PathBuf, images_dir: PathBuf) -> Self {
        Self { root, images_dir }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.root.clone(), config.images_dir.clone())
    }
}
