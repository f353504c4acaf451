use std::path::Path;

use image::{ImageReader, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::sim::{Bindings, Entity, Rect, SignalId, World};

use super::types::{LevelLoadError, RasterSources};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

pub(crate) fn load_raster_layers(
    sources: &RasterSources,
    world: &mut World,
) -> Result<(), LevelLoadError> {
    let tiles = read_mask(&sources.tiles)?;
    let doors = read_mask(&sources.doors)?;
    let buttons = read_mask(&sources.buttons)?;

    if tiles.dimensions() != doors.dimensions() || tiles.dimensions() != buttons.dimensions() {
        warn!(
            tiles = ?tiles.dimensions(),
            doors = ?doors.dimensions(),
            buttons = ?buttons.dimensions(),
            "raster_layer_size_mismatch"
        );
    }

    let tile_count = append_tile_layer(world, &tiles);
    debug!(path = %sources.tiles.display(), count = tile_count, "raster_layer_loaded");
    let door_count = append_door_layer(world, &doors);
    debug!(path = %sources.doors.display(), count = door_count, "raster_layer_loaded");
    let button_count = append_button_layer(world, &buttons);
    debug!(path = %sources.buttons.display(), count = button_count, "raster_layer_loaded");
    Ok(())
}

fn read_mask(path: &Path) -> Result<RgbaImage, LevelLoadError> {
    let reader = ImageReader::open(path).map_err(|source| LevelLoadError::OpenImage {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader
        .decode()
        .map_err(|source| LevelLoadError::DecodeImage {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decoded.to_rgba8())
}

/// Non-white pixels, rows first, as `(column, row, colour)`.
fn marked_pixels(image: &RgbaImage) -> impl Iterator<Item = (u32, u32, Rgba<u8>)> + '_ {
    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| **pixel != WHITE)
        .map(|(x, y, pixel)| (x, y, *pixel))
}

fn pixel_signal(pixel: Rgba<u8>) -> SignalId {
    let [r, g, b, _] = pixel.0;
    SignalId::from_rgb(r, g, b)
}

pub fn append_tile_layer(world: &mut World, image: &RgbaImage) -> usize {
    let mut count = 0;
    for (x, y, _) in marked_pixels(image) {
        world.push_tile(Entity::tile(Rect::unit(x as f32, y as f32)));
        count += 1;
    }
    count
}

/// Each door is solid and visible until its colour's signal is raised.
pub fn append_door_layer(world: &mut World, image: &RgbaImage) -> usize {
    let mut count = 0;
    for (x, y, pixel) in marked_pixels(image) {
        let signal = world.signals_mut().sign(pixel_signal(pixel));
        world.push_door(Entity::door(Rect::unit(x as f32, y as f32)).with_bindings(Bindings {
            solid: Some(signal),
            visible: Some(signal),
            ..Bindings::default()
        }));
        count += 1;
    }
    count
}

/// Each button raises its colour's signal when touched and hides once raised.
pub fn append_button_layer(world: &mut World, image: &RgbaImage) -> usize {
    let mut count = 0;
    for (x, y, pixel) in marked_pixels(image) {
        let signal = world.signals_mut().sign(pixel_signal(pixel));
        world.push_button(
            Entity::button(Rect::unit(x as f32, y as f32))
                .with_solid(false)
                .with_bindings(Bindings {
                    pressed: Some(signal),
                    visible: Some(signal),
                    ..Bindings::default()
                }),
        );
        count += 1;
    }
    count
}
