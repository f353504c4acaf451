mod pipeline;
mod raster;
mod records;
mod types;

pub use pipeline::{load_level_dir, load_world};
pub use raster::{append_button_layer, append_door_layer, append_tile_layer};
pub use types::{
    LevelLoadError, LevelSources, LevelSummary, RasterSources, BUTTON_MASK_FILE, DOOR_MASK_FILE,
    RECORDS_FILE, TILE_MASK_FILE,
};
