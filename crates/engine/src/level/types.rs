use std::path::PathBuf;

use thiserror::Error;

use crate::sim::PlatformError;

pub const TILE_MASK_FILE: &str = "map.bmp";
pub const DOOR_MASK_FILE: &str = "door.bmp";
pub const BUTTON_MASK_FILE: &str = "button.bmp";
pub const RECORDS_FILE: &str = "Entities.json";

/// The three mask images of a raster level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSources {
    pub tiles: PathBuf,
    pub doors: PathBuf,
    pub buttons: PathBuf,
}

/// Where a level comes from. Raster layers load first, then records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSources {
    pub raster: Option<RasterSources>,
    pub records: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelSummary {
    pub tiles: usize,
    pub doors: usize,
    pub buttons: usize,
    pub platforms: usize,
    pub signals: usize,
}

#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error(
        "no level sources in {dir}: expected {tile_mask_file} (with {door_mask_file} and \
{button_mask_file}) and/or {records_file}"
    )]
    NoSources {
        dir: PathBuf,
        tile_mask_file: &'static str,
        door_mask_file: &'static str,
        button_mask_file: &'static str,
        records_file: &'static str,
    },
    #[error("failed to open image {path}: {source}")]
    OpenImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    DecodeImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read record file {path}: {source}")]
    ReadRecords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record file {path} at {location}: {message}")]
    ParseRecords {
        path: PathBuf,
        location: String,
        message: String,
    },
    #[error("record {index} in {path} has invalid size {width}x{height}")]
    InvalidSize {
        path: PathBuf,
        index: usize,
        width: f32,
        height: f32,
    },
    #[error("platform record {index} in {path} is invalid: {source}")]
    InvalidPlatform {
        path: PathBuf,
        index: usize,
        #[source]
        source: PlatformError,
    },
}
