// src/config.rs
//! Map tile settings with file-backed storage
//!
//! Every consumer receives the settings by reference; nothing here is global.

use crate::error::{Result, TileError};
use crate::map::TileProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TILE_SIZE: u16 = 256;
pub const DEFAULT_MAX_TILE_BYTES: usize = 512 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapTileSettings {
    pub provider: TileProvider,
    pub tile_size: u16,
    pub tile_hosts: Vec<String>,
    pub user_agent: String,
    pub max_tile_bytes: usize,
    pub connect_timeout_ms: u64,
    pub timeout_ms: u64,
}

impl Default for MapTileSettings {
    fn default() -> Self {
        Self {
            provider: TileProvider::Osm,
            tile_size: DEFAULT_TILE_SIZE,
            tile_hosts: vec![
                "https://a.tile.openstreetmap.org".to_string(),
                "https://b.tile.openstreetmap.org".to_string(),
                "https://c.tile.openstreetmap.org".to_string(),
            ],
            user_agent: format!("geotile/{} (Rust slippy map client)", env!("CARGO_PKG_VERSION")),
            max_tile_bytes: DEFAULT_MAX_TILE_BYTES,
            connect_timeout_ms: 4000,
            timeout_ms: 7000,
        }
    }
}

impl MapTileSettings {
    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load settings from a file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| TileError::Config(format!("Failed to read config file: {}", e)))?;

        let settings: Self = serde_json::from_str(&contents)
            .map_err(|e| TileError::Config(format!("Failed to parse config file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TileError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|e| TileError::Config(format!("Failed to write config file: {}", e)))?;

        log::debug!("saved settings to {}", path.display());
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| TileError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("geotile").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(TileError::Config("tile_size must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// Whether the tile hosts serve imagery in the configured projection.
    ///
    /// OpenStreetMap hosts only serve spherical Web-Mercator tiles.
    pub fn hosts_match_provider(&self) -> bool {
        match self.provider {
            TileProvider::Osm => true,
            TileProvider::Yandex => !self
                .tile_hosts
                .iter()
                .any(|host| host.contains("openstreetmap.org")),
        }
    }

    pub fn update_provider(&mut self, provider: TileProvider) {
        self.provider = provider;
    }

    pub fn update_tile_size(&mut self, tile_size: u16) -> Result<()> {
        if tile_size == 0 {
            return Err(TileError::Config("tile_size must be greater than zero".to_string()));
        }
        self.tile_size = tile_size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("geotile-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_settings() {
        let settings = MapTileSettings::default();
        assert_eq!(settings.provider, TileProvider::Osm);
        assert_eq!(settings.tile_size, 256);
        assert_eq!(settings.tile_hosts.len(), 3);
        assert_eq!(settings.max_tile_bytes, 512 * 1024);
    }

    #[test]
    fn test_update_tile_size_rejects_zero() {
        let mut settings = MapTileSettings::default();
        assert!(settings.update_tile_size(0).is_err());
        assert_eq!(settings.tile_size, 256);
        settings.update_tile_size(512).unwrap();
        assert_eq!(settings.tile_size, 512);
    }

    #[test]
    fn test_hosts_match_provider() {
        let mut settings = MapTileSettings::default();
        assert!(settings.hosts_match_provider());

        settings.update_provider(TileProvider::Yandex);
        assert!(!settings.hosts_match_provider());

        settings.tile_hosts = vec!["https://core-renderer-tiles.maps.yandex.net".to_string()];
        assert!(settings.hosts_match_provider());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_config("missing");
        let settings = MapTileSettings::load_from(&path).unwrap();
        assert_eq!(settings, MapTileSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_config("roundtrip");
        let mut settings = MapTileSettings::default();
        settings.update_provider(TileProvider::Yandex);
        settings.update_tile_size(128).unwrap();
        settings.save_to(&path).unwrap();

        let loaded = MapTileSettings::load_from(&path).unwrap();
        assert_eq!(loaded.provider, TileProvider::Yandex);
        assert_eq!(loaded.tile_size, 128);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_config("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "provider": "yandex" }"#).unwrap();

        let loaded = MapTileSettings::load_from(&path).unwrap();
        assert_eq!(loaded.provider, TileProvider::Yandex);
        assert_eq!(loaded.tile_size, 256);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_zero_tile_size_in_file_rejected() {
        let path = temp_config("zero");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "tile_size": 0 }"#).unwrap();

        assert!(MapTileSettings::load_from(&path).is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
