// src/map/geo_point.rs
//! Geographic position anchored to a raster tile and a pixel inside it

use super::projection::{clamp_latitude, tiles_per_axis, TileProvider};
use crate::config::MapTileSettings;

/// Deepest zoom whose tile grid still fits `u32` tile indices
pub const MAX_ZOOM: u8 = 30;

/// A map position expressed both geographically and in tile space.
///
/// Points built from a tile address carry no geographic coordinate until
/// one is derived, either by panning with [`GeoPoint::move_by`] or by a
/// zoom change. Tile and pixel fields always satisfy
/// `tile < 2^zoom` and `0 <= pixel < tile_size` after a mutating call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    coordinate: Option<(f64, f64)>,
    tile_x: u32,
    tile_y: u32,
    pixel_x: i32,
    pixel_y: i32,
    zoom_level: u8,
    projection: TileProvider,
}

impl GeoPoint {
    /// Point at the upper-left corner of a tile. Indices are not range-checked.
    pub fn from_tile(tile_x: u32, tile_y: u32, zoom: u8, settings: &MapTileSettings) -> Self {
        Self {
            coordinate: None,
            tile_x,
            tile_y,
            pixel_x: 0,
            pixel_y: 0,
            zoom_level: zoom.min(MAX_ZOOM),
            projection: settings.provider,
        }
    }

    /// Point at a geographic coordinate, projected immediately under the configured provider
    pub fn from_lat_lon(lat: f64, lon: f64, zoom: u8, settings: &MapTileSettings) -> Self {
        let mut point = Self {
            coordinate: None,
            tile_x: 0,
            tile_y: 0,
            pixel_x: 0,
            pixel_y: 0,
            zoom_level: 0,
            projection: settings.provider,
        };
        point.project(lat, lon, zoom.min(MAX_ZOOM), settings.tile_size);
        point
    }

    /// Re-project at `zoom` under the currently configured provider.
    ///
    /// Does nothing when both the zoom and the provider are unchanged.
    pub fn set_zoom(&mut self, zoom: u8, settings: &MapTileSettings) {
        let zoom = zoom.min(MAX_ZOOM);
        if zoom == self.zoom_level && settings.provider == self.projection {
            return;
        }

        let (lat, lon) = match self.coordinate {
            Some(coordinate) => coordinate,
            None => self.unproject(settings.tile_size),
        };
        self.projection = settings.provider;
        self.project(lat, lon, zoom, settings.tile_size);
    }

    /// Pan the view by a pixel delta and re-derive the geographic coordinate.
    ///
    /// Scrolling the view moves the anchored content the other way, so the
    /// delta is subtracted. Carries into the tile index for any delta size;
    /// the position stops at the edge of the world.
    pub fn move_by(&mut self, dx: i32, dy: i32, settings: &MapTileSettings) {
        let size = i64::from(settings.tile_size.max(1));
        let world = size << self.zoom_level;

        let (tile_x, pixel_x) = carry(self.tile_x, self.pixel_x, dx, size, world);
        let (tile_y, pixel_y) = carry(self.tile_y, self.pixel_y, dy, size, world);
        log::trace!(
            "move: x {}/{} -> {}/{}, y {}/{} -> {}/{}",
            self.tile_x,
            self.pixel_x,
            tile_x,
            pixel_x,
            self.tile_y,
            self.pixel_y,
            tile_y,
            pixel_y
        );

        self.tile_x = tile_x;
        self.pixel_x = pixel_x;
        self.tile_y = tile_y;
        self.pixel_y = pixel_y;
        self.coordinate = Some(self.unproject(settings.tile_size));
    }

    fn project(&mut self, lat: f64, lon: f64, zoom: u8, tile_size: u16) {
        let lat = clamp_latitude(lat);
        let (x_raw, y_raw) = self.projection.project(lat, lon, zoom);
        let size = u64::from(tile_size.max(1));

        self.tile_x = x_raw.floor() as u32;
        self.tile_y = y_raw.floor() as u32;
        self.pixel_x = ((x_raw * size as f64) as u64 % size) as i32;
        self.pixel_y = ((y_raw * size as f64) as u64 % size) as i32;
        self.zoom_level = zoom;
        self.coordinate = Some((lat, lon));

        log::debug!(
            "projected ({}, {}) to {}/{}/{} ({}/{}) via {}",
            lat,
            lon,
            zoom,
            self.tile_x,
            self.tile_y,
            self.pixel_x,
            self.pixel_y,
            self.projection
        );
    }

    fn unproject(&self, tile_size: u16) -> (f64, f64) {
        let n = tiles_per_axis(self.zoom_level);
        let size = f64::from(tile_size.max(1));
        let x_norm = ((self.tile_x as f64 + self.pixel_x as f64 / size) / n).clamp(0.0, 1.0);
        let y_norm = ((self.tile_y as f64 + self.pixel_y as f64 / size) / n).clamp(0.0, 1.0);

        let lon = x_norm * 360.0 - 180.0;
        let lat = self.projection.unproject_latitude(y_norm);
        (lat, lon)
    }

    /// Latitude and longitude in degrees, if known
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        self.coordinate
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinate.map(|(lat, _)| lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.coordinate.map(|(_, lon)| lon)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom_level
    }

    pub fn tile(&self) -> (u32, u32) {
        (self.tile_x, self.tile_y)
    }

    /// Pixel offset inside the current tile
    pub fn pixel(&self) -> (i32, i32) {
        (self.pixel_x, self.pixel_y)
    }

    /// Projection used for the last computation
    pub fn projection(&self) -> TileProvider {
        self.projection
    }
}

/// Apply a view delta along one axis, returning the new tile index and pixel offset
fn carry(tile: u32, pixel: i32, delta: i32, size: i64, world: i64) -> (u32, i32) {
    let global = i64::from(tile) * size + i64::from(pixel) - i64::from(delta);
    let global = global.clamp(0, world - 1);
    ((global / size) as u32, (global % size) as i32)
}
