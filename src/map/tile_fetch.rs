// src/map/tile_fetch.rs
//! Tile downloading into in-memory, seekable tile files

use super::tile_url::TileAddress;
use crate::config::MapTileSettings;
use crate::error::{Result, TileError};
use std::io::{self, Read, Seek, SeekFrom};
use std::time::Duration;

/// Blocking tile downloader bound to one set of tile settings
pub struct TileFetcher {
    client: reqwest::blocking::Client,
    settings: MapTileSettings,
}

impl TileFetcher {
    pub fn new(settings: &MapTileSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Download a single tile
    pub fn fetch(&self, tile: &TileAddress) -> Result<Vec<u8>> {
        let url = tile.url(&self.settings)?;
        log::debug!("fetching tile {}", url);

        let response = self.client.get(&url).send()?;

        if response.status() != reqwest::StatusCode::OK {
            log::debug!("HTTP {} for {}", response.status(), url);
            return Err(TileError::Other(format!("HTTP {} for {}", response.status(), url)));
        }

        let limit = self.settings.max_tile_bytes;
        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                log::warn!("tile {} too large ({} bytes)", url, length);
                return Err(TileError::TileTooLarge {
                    size: length as usize,
                    limit,
                });
            }
        }

        let bytes = read_body(response, limit)?;
        log::debug!("tile {} downloaded ({} bytes)", tile, bytes.len());
        Ok(bytes)
    }

    /// Resolve a tile path and download it into a readable file
    pub fn open(&self, path: &str) -> Result<TileFile> {
        let tile = TileAddress::parse(path)?;
        Ok(TileFile::new(self.fetch(&tile)?))
    }
}

/// Read at most `limit` bytes; a longer or empty body is an error
fn read_body<R: Read>(reader: R, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut bytes)?;

    if bytes.len() > limit {
        return Err(TileError::TileTooLarge {
            size: bytes.len(),
            limit,
        });
    }
    if bytes.is_empty() {
        return Err(TileError::Other("empty tile response".to_string()));
    }
    Ok(bytes)
}

/// Read-only file over a downloaded tile.
///
/// Seeking past the end fails and leaves the position where it was.
#[derive(Debug, Clone)]
pub struct TileFile {
    bytes: Vec<u8>,
    pos: usize,
}

impl TileFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn tell(&self) -> u64 {
        self.pos as u64
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl Read for TileFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.bytes[self.pos.min(self.bytes.len())..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.pos += count;
        Ok(count)
    }
}

impl Seek for TileFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.bytes.len() as i128;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.pos as i128 + offset as i128,
            SeekFrom::End(offset) => len + offset as i128,
        };

        if target < 0 || target > len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("seek to {} outside tile of {} bytes", target, len),
            ));
        }

        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}
