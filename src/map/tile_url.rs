// src/map/tile_url.rs
//! Tile addresses, tile path parsing and tile host rotation

use super::geo_point::GeoPoint;
use crate::config::MapTileSettings;
use crate::error::{Result, TileError};
use std::fmt;

/// A raster tile as addressed by `{z}/{x}/{y}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileAddress {
    pub zoom: u32,
    pub x: u32,
    pub y: u32,
    pub extension: String,
}

impl TileAddress {
    pub fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self {
            zoom,
            x,
            y,
            extension: "png".to_string(),
        }
    }

    /// Parse the trailing `/{z}/{x}/{y}.{ext}` of a tile path.
    ///
    /// Anything before the zoom segment (a drive letter, a cache directory)
    /// is ignored, but the zoom segment itself must be preceded by `/`.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || TileError::InvalidTilePath(path.to_string());

        let (rest, file) = path.rsplit_once('/').ok_or_else(invalid)?;
        let (y, extension) = file.rsplit_once('.').ok_or_else(invalid)?;
        let (rest, x) = rest.rsplit_once('/').ok_or_else(invalid)?;
        let (_, zoom) = rest.rsplit_once('/').ok_or_else(invalid)?;

        if extension.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            zoom: parse_index(zoom).ok_or_else(invalid)?,
            x: parse_index(x).ok_or_else(invalid)?,
            y: parse_index(y).ok_or_else(invalid)?,
            extension: extension.to_string(),
        })
    }

    /// Index of the mirror host serving this tile
    pub fn host_index(&self, host_count: usize) -> usize {
        if host_count == 0 {
            return 0;
        }
        let sum = self.zoom.wrapping_add(self.x).wrapping_add(self.y);
        sum as usize % host_count
    }

    /// Full download URL on the rotated tile host.
    ///
    /// Tile servers only serve PNG, whatever extension the path carried.
    pub fn url(&self, settings: &MapTileSettings) -> Result<String> {
        let host = settings
            .tile_hosts
            .get(self.host_index(settings.tile_hosts.len()))
            .ok_or_else(|| TileError::Config("no tile hosts configured".to_string()))?;

        Ok(format!(
            "{}/{}/{}/{}.png",
            host.trim_end_matches('/'),
            self.zoom,
            self.x,
            self.y
        ))
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}.{}", self.zoom, self.x, self.y, self.extension)
    }
}

impl From<&GeoPoint> for TileAddress {
    fn from(point: &GeoPoint) -> Self {
        let (x, y) = point.tile();
        Self::new(u32::from(point.zoom()), x, y)
    }
}

fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drive_path() {
        let tile = TileAddress::parse("U:/15/17437/11371.png").unwrap();
        assert_eq!(tile, TileAddress::new(15, 17437, 11371));
    }

    #[test]
    fn test_parse_keeps_extension() {
        let tile = TileAddress::parse("/sdcard/maps/osm/3/4/5.jpg").unwrap();
        assert_eq!(tile.zoom, 3);
        assert_eq!(tile.x, 4);
        assert_eq!(tile.y, 5);
        assert_eq!(tile.extension, "jpg");
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        for path in [
            "",
            "15/17437/11371.png",
            "/17437/11371.png",
            "/15/17437/11371",
            "/15/17437/11371.",
            "/15/17437/.png",
            "/15//11371.png",
            "/15/x/11371.png",
            "/15/+1/11371.png",
            "/15/17437/4294967296.png",
        ] {
            assert!(TileAddress::parse(path).is_err(), "accepted {:?}", path);
        }
    }

    #[test]
    fn test_parse_accepts_max_index() {
        let tile = TileAddress::parse("/0/4294967295/0.png").unwrap();
        assert_eq!(tile.x, u32::MAX);
    }

    #[test]
    fn test_host_rotation() {
        assert_eq!(TileAddress::new(0, 0, 0).host_index(3), 0);
        assert_eq!(TileAddress::new(1, 1, 0).host_index(3), 2);
        assert_eq!(TileAddress::new(15, 17437, 11371).host_index(3), (15 + 17437 + 11371) % 3);
        assert_eq!(TileAddress::new(u32::MAX, 1, 0).host_index(3), 0);
    }

    #[test]
    fn test_url() {
        let settings = MapTileSettings::default();
        let url = TileAddress::new(1, 1, 0).url(&settings).unwrap();
        assert_eq!(url, "https://c.tile.openstreetmap.org/1/1/0.png");
    }

    #[test]
    fn test_url_always_requests_png() {
        let settings = MapTileSettings::default();
        let tile = TileAddress::parse("U:/3/4/5.jpg").unwrap();
        assert_eq!(tile.url(&settings).unwrap(), "https://a.tile.openstreetmap.org/3/4/5.png");
    }

    #[test]
    fn test_url_without_hosts() {
        let settings = MapTileSettings {
            tile_hosts: Vec::new(),
            ..MapTileSettings::default()
        };
        assert!(TileAddress::new(1, 1, 0).url(&settings).is_err());
    }

    #[test]
    fn test_from_geo_point() {
        let settings = MapTileSettings::default();
        let point = GeoPoint::from_lat_lon(37.7749, -122.4194, 10, &settings);
        let tile = TileAddress::from(&point);
        assert_eq!(tile.to_string(), "10/163/395.png");
    }
}
