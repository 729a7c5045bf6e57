// src/map/mod.rs
//! Map tile projection, addressing and fetching

mod geo_point;
mod projection;
mod tile_fetch;
mod tile_url;

pub use geo_point::{GeoPoint, MAX_ZOOM};
pub use projection::{
    clamp_latitude, lat_lon_to_tile, tile_to_lat_lon, tiles_per_axis, TileProvider, ECCENTRICITY,
    ELLIPSOIDAL_INVERSE_ITERATIONS, LATITUDE_LIMIT,
};
pub use tile_fetch::{TileFetcher, TileFile};
pub use tile_url::TileAddress;
