// ABOUTME: HTTP server for biomedic: static files, equipment images, and the image listing API.
// ABOUTME: Also carries the client used to fetch the image listing for the image picker.

pub mod api;
pub mod app_state;
pub mod config;
pub mod cors;
pub mod image_client;
pub mod routes;
pub mod static_files;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ServerConfig};
pub use image_client::{ImageClientError, fetch_image_list, load_picker};
pub use routes::create_router;
