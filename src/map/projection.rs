// src/map/projection.rs
//! Mercator projections used by raster tile providers

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;
use std::str::FromStr;

/// Mercator-valid latitude bound in degrees
pub const LATITUDE_LIMIT: f64 = 85.0511287798;

/// WGS84 first eccentricity
pub const ECCENTRICITY: f64 = 0.0818191908426;

/// Fixed iteration count for the ellipsoidal inverse; not convergence-checked.
pub const ELLIPSOIDAL_INVERSE_ITERATIONS: usize = 5;

/// Keeps raw tile coordinates strictly below the grid edge
const EDGE_EPSILON: f64 = 1e-6;

/// Which projection the tile grid of a provider is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileProvider {
    /// OpenStreetMap and friends: spherical Web-Mercator
    #[default]
    Osm,
    /// Yandex: ellipsoidal (WGS84) Mercator
    Yandex,
}

impl TileProvider {
    pub fn name(&self) -> &str {
        match self {
            TileProvider::Osm => "osm",
            TileProvider::Yandex => "yandex",
        }
    }

    /// Forward projection to fractional tile coordinates at `zoom`.
    ///
    /// Latitude is clamped before anything transcendental is evaluated, so
    /// the poles never reach `ln(tan)`. Both results lie in `[0, 2^zoom)`.
    pub fn project(&self, lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
        let n = tiles_per_axis(zoom);
        let lat_rad = clamp_latitude(lat).to_radians();

        let x_raw = (lon + 180.0) / 360.0 * n;
        let y_raw = match self {
            TileProvider::Osm => (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n,
            TileProvider::Yandex => {
                let e_sin = ECCENTRICITY * lat_rad.sin();
                let phi = (1.0 - e_sin) / (1.0 + e_sin);
                let theta = (FRAC_PI_4 + lat_rad / 2.0).tan() * phi.powf(ECCENTRICITY / 2.0);
                (1.0 - theta.ln() / PI) / 2.0 * n
            }
        };

        let limit = n - EDGE_EPSILON;
        (x_raw.clamp(0.0, limit), y_raw.clamp(0.0, limit))
    }

    /// Latitude in degrees for a normalized vertical position (0 = north edge, 1 = south edge)
    pub fn unproject_latitude(&self, y_norm: f64) -> f64 {
        let psi = PI * (1.0 - 2.0 * y_norm.clamp(0.0, 1.0));
        let lat = match self {
            TileProvider::Osm => psi.sinh().atan().to_degrees(),
            TileProvider::Yandex => {
                let mut lat_rad = 2.0 * psi.exp().atan() - FRAC_PI_2;
                for _ in 0..ELLIPSOIDAL_INVERSE_ITERATIONS {
                    let e_sin = ECCENTRICITY * lat_rad.sin();
                    let ratio = (1.0 + e_sin) / (1.0 - e_sin);
                    lat_rad = 2.0 * (psi.exp() * ratio.powf(ECCENTRICITY / 2.0)).atan() - FRAC_PI_2;
                }
                lat_rad.to_degrees()
            }
        };
        clamp_latitude(lat)
    }
}

impl fmt::Display for TileProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TileProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "osm" | "openstreetmap" => Ok(TileProvider::Osm),
            "yandex" => Ok(TileProvider::Yandex),
            other => Err(format!("unknown tile provider '{}'", other)),
        }
    }
}

/// Number of tiles along one axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> f64 {
    2_f64.powi(zoom as i32)
}

pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-LATITUDE_LIMIT, LATITUDE_LIMIT)
}

/// Calculate tile coordinates from lat/lon and zoom level
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8, provider: TileProvider) -> (u32, u32) {
    let (x, y) = provider.project(lat, lon, zoom);
    (x.floor() as u32, y.floor() as u32)
}

/// Calculate lat/lon of the upper-left corner of a tile
pub fn tile_to_lat_lon(x: u32, y: u32, zoom: u8, provider: TileProvider) -> (f64, f64) {
    let n = tiles_per_axis(zoom);
    let lon = (x as f64 / n).clamp(0.0, 1.0) * 360.0 - 180.0;
    let lat = provider.unproject_latitude(y as f64 / n);
    (lat, lon)
}
