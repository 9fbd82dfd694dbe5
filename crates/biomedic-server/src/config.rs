// ABOUTME: Configuration loading for the biomedic static server.
// ABOUTME: Reads BIOMEDIC_* environment variables with defaults; CLI flags may override afterwards.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIOMEDIC_BIND is not a valid socket address: {0}")]
    InvalidBind(String),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Directory static files are served from; `/` maps to `index.html` here.
    pub root: PathBuf,
    /// Directory listed by `/api/images` and served under `/images/equipos/`.
    pub images_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - BIOMEDIC_BIND: socket address (default: 0.0.0.0:8080)
    /// - BIOMEDIC_ROOT: static root (default: current directory)
    /// - BIOMEDIC_IMAGES_DIR: image directory (default: <root>/images/equipos)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let bind_str = var("BIOMEDIC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = parse_bind(&bind_str)?;

        let root = var("BIOMEDIC_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let images_dir = var("BIOMEDIC_IMAGES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_images_dir(&root));

        Ok(Self {
            bind,
            root,
            images_dir,
        })
    }
}

pub fn parse_bind(value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidBind(value.to_string()))
}

pub fn default_images_dir(root: &std::path::Path) -> PathBuf {
    root.join("images").join("equipos")
}
