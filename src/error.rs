// src/error.rs
//! Error types for tile addressing, fetching and configuration

use std::fmt;

pub type Result<T> = std::result::Result<T, TileError>;

#[derive(Debug)]
pub enum TileError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    InvalidTilePath(String),
    TileTooLarge { size: usize, limit: usize },
    Config(String),
    Other(String),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileError::Io(e) => write!(f, "IO error: {}", e),
            TileError::Json(e) => write!(f, "JSON error: {}", e),
            TileError::Http(e) => write!(f, "HTTP error: {}", e),
            TileError::InvalidTilePath(path) => write!(f, "Invalid tile path: {}", path),
            TileError::TileTooLarge { size, limit } => {
                write!(f, "Tile too large: {} bytes (limit {})", size, limit)
            }
            TileError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TileError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TileError::Io(e) => Some(e),
            TileError::Json(e) => Some(e),
            TileError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TileError {
    fn from(error: std::io::Error) -> Self {
        TileError::Io(error)
    }
}

impl From<serde_json::Error> for TileError {
    fn from(error: serde_json::Error) -> Self {
        TileError::Json(error)
    }
}

impl From<reqwest::Error> for TileError {
    fn from(error: reqwest::Error) -> Self {
        TileError::Http(error)
    }
}
