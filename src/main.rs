// src/main.rs
//! Geotile - project coordinates onto map tiles and fetch them

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geotile::{map::TileFetcher, GeoPoint, MapTileSettings, TileAddress, TileProvider};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geotile", version, about = "Slippy map tile projection tool")]
struct Cli {
    /// Settings file (defaults to ~/.config/geotile/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project a coordinate onto the tile grid
    Project {
        #[command(flatten)]
        location: Location,

        /// Pan the view by a pixel delta "dx,dy"; may be repeated
        #[arg(long = "pan", value_parser = parse_pan, allow_hyphen_values = true)]
        pans: Vec<(i32, i32)>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Download the tile under a coordinate
    Fetch {
        #[command(flatten)]
        location: Location,

        /// Output file
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Show and optionally update the stored settings
    Config {
        #[arg(long)]
        provider: Option<TileProvider>,

        #[arg(long)]
        tile_size: Option<u16>,
    },
}

#[derive(Args)]
struct Location {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    #[arg(long, default_value_t = 15)]
    zoom: u8,

    /// Override the configured projection
    #[arg(long)]
    provider: Option<TileProvider>,
}

impl Location {
    fn point(&self, settings: &mut MapTileSettings) -> GeoPoint {
        if let Some(provider) = self.provider {
            settings.update_provider(provider);
        }
        GeoPoint::from_lat_lon(self.lat, self.lon, self.zoom, settings)
    }
}

fn parse_pan(value: &str) -> std::result::Result<(i32, i32), String> {
    let (dx, dy) = value
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy but got '{}'", value))?;
    let dx = dx.trim().parse().map_err(|e| format!("invalid dx '{}': {}", dx, e))?;
    let dy = dy.trim().parse().map_err(|e| format!("invalid dy '{}': {}", dy, e))?;
    Ok((dx, dy))
}

fn load_settings(path: &Option<PathBuf>) -> Result<MapTileSettings> {
    let settings = match path {
        Some(path) => MapTileSettings::load_from(path),
        None => MapTileSettings::load(),
    };
    settings.context("Failed to load settings")
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;

    match cli.command {
        Command::Project { location, pans, json } => {
            let mut point = location.point(&mut settings);
            for (dx, dy) in pans {
                point.move_by(dx, dy, &settings);
            }
            print_point(&point, &settings, json)?;
        }
        Command::Fetch { location, out } => {
            let point = location.point(&mut settings);
            if !settings.hosts_match_provider() {
                anyhow::bail!(
                    "{} tiles cannot be fetched from {}; configure matching tile_hosts",
                    settings.provider,
                    settings.tile_hosts.join(", ")
                );
            }
            let tile = TileAddress::from(&point);
            let fetcher = TileFetcher::new(&settings)?;
            let bytes = fetcher
                .fetch(&tile)
                .with_context(|| format!("Failed to fetch tile {}", tile))?;
            std::fs::write(&out, &bytes)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Saved {} ({} bytes) to {}", tile, bytes.len(), out.display());
        }
        Command::Config { provider, tile_size } => {
            let changed = provider.is_some() || tile_size.is_some();
            if let Some(provider) = provider {
                settings.update_provider(provider);
            }
            if let Some(tile_size) = tile_size {
                settings.update_tile_size(tile_size)?;
            }
            if changed {
                match &cli.config {
                    Some(path) => settings.save_to(path)?,
                    None => settings.save()?,
                }
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn print_point(point: &GeoPoint, settings: &MapTileSettings, json: bool) -> Result<()> {
    let tile = TileAddress::from(point);
    let url = tile.url(settings)?;
    let (tile_x, tile_y) = point.tile();
    let (pixel_x, pixel_y) = point.pixel();

    if json {
        let value = serde_json::json!({
            "latitude": point.latitude(),
            "longitude": point.longitude(),
            "zoom": point.zoom(),
            "tile_x": tile_x,
            "tile_y": tile_y,
            "pixel_x": pixel_x,
            "pixel_y": pixel_y,
            "projection": point.projection(),
            "url": url,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        if let Some((lat, lon)) = point.lat_lon() {
            println!("Position:   {:.6}, {:.6}", lat, lon);
        }
        println!("Projection: {}", point.projection());
        println!("Tile:       {}/{}/{}", point.zoom(), tile_x, tile_y);
        println!("Pixel:      {}, {}", pixel_x, pixel_y);
        println!("URL:        {}", url);
    }
    Ok(())
}
