// src/lib.rs
//! Geotile Library
//!
//! Geographic to raster-tile projection for slippy map viewers, with
//! viewport panning and single-tile fetching.

pub mod config;
pub mod error;
pub mod map;

// Re-export main types for convenience
pub use config::MapTileSettings;
pub use error::{Result, TileError};
pub use map::{GeoPoint, TileAddress, TileProvider};
