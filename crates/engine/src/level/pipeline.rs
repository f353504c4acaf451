use std::path::Path;

use tracing::info;

use crate::sim::{Clock, World};

use super::raster::load_raster_layers;
use super::records::load_record_file;
use super::types::{
    LevelLoadError, LevelSources, LevelSummary, RasterSources, BUTTON_MASK_FILE, DOOR_MASK_FILE,
    RECORDS_FILE, TILE_MASK_FILE,
};

impl LevelSources {
    /// Uses the conventional file names inside `dir`. The raster group is
    /// picked up when the tile mask exists, the record file when it exists.
    pub fn from_dir(dir: &Path) -> Result<Self, LevelLoadError> {
        let tile_mask = dir.join(TILE_MASK_FILE);
        let records = dir.join(RECORDS_FILE);

        let sources = Self {
            raster: tile_mask.is_file().then(|| RasterSources {
                tiles: tile_mask,
                doors: dir.join(DOOR_MASK_FILE),
                buttons: dir.join(BUTTON_MASK_FILE),
            }),
            records: records.is_file().then_some(records),
        };

        if sources.raster.is_none() && sources.records.is_none() {
            return Err(LevelLoadError::NoSources {
                dir: dir.to_path_buf(),
                tile_mask_file: TILE_MASK_FILE,
                door_mask_file: DOOR_MASK_FILE,
                button_mask_file: BUTTON_MASK_FILE,
                records_file: RECORDS_FILE,
            });
        }
        Ok(sources)
    }
}

impl LevelSummary {
    pub fn of(world: &World) -> Self {
        Self {
            tiles: world.tiles().len(),
            doors: world.doors().len(),
            buttons: world.buttons().len(),
            platforms: world.platforms().len(),
            signals: world.signals().len(),
        }
    }
}

pub fn load_world(sources: &LevelSources, clock: Box<dyn Clock>) -> Result<World, LevelLoadError> {
    let mut world = World::with_clock(clock);
    if let Some(raster) = &sources.raster {
        load_raster_layers(raster, &mut world)?;
    }
    if let Some(records) = &sources.records {
        load_record_file(records, &mut world)?;
    }

    let summary = LevelSummary::of(&world);
    info!(
        tiles = summary.tiles,
        doors = summary.doors,
        buttons = summary.buttons,
        platforms = summary.platforms,
        signals = summary.signals,
        "level_loaded"
    );
    Ok(world)
}

pub fn load_level_dir(dir: &Path, clock: Box<dyn Clock>) -> Result<World, LevelLoadError> {
    let sources = LevelSources::from_dir(dir)?;
    load_world(&sources, clock)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use serde_json::json;

    use super::*;
    use crate::sim::{Rect, SignalId, SimulationClock};

    fn write_mask(path: &Path, marks: &[(u32, u32, [u8; 3])]) {
        let mut image = RgbaImage::from_pixel(6, 6, Rgba([255, 255, 255, 255]));
        for (x, y, [r, g, b]) in marks {
            image.put_pixel(*x, *y, Rgba([*r, *g, *b, 255]));
        }
        image.save(path).expect("write mask");
    }

    fn clock() -> Box<dyn Clock> {
        Box::new(SimulationClock::default())
    }

    #[test]
    fn loads_raster_then_records_into_one_world() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_mask(&dir.path().join(TILE_MASK_FILE), &[(3, 4, [0, 0, 0])]);
        write_mask(&dir.path().join(DOOR_MASK_FILE), &[(1, 1, [7, 0, 0])]);
        write_mask(&dir.path().join(BUTTON_MASK_FILE), &[(2, 2, [7, 0, 0])]);
        fs::write(
            dir.path().join(RECORDS_FILE),
            json!([
                { "type": "tile", "data": { "x": 10, "y": 10, "dx": 4, "dy": 1 } },
                { "type": "door", "data": { "x": 5, "y": 5, "dx": 1, "dy": 2, "stateSolid": 7 } }
            ])
            .to_string(),
        )
        .expect("write records");

        let world = load_level_dir(dir.path(), clock()).expect("world");
        let summary = LevelSummary::of(&world);

        assert_eq!(
            summary,
            LevelSummary {
                tiles: 2,
                doors: 2,
                buttons: 1,
                platforms: 0,
                signals: 1,
            }
        );
        assert_eq!(world.tiles()[0].bounds(), Rect::unit(3.0, 4.0));
        assert_eq!(world.tiles()[1].bounds(), Rect::new(10.0, 10.0, 4.0, 1.0));
        let shared = world.signals().handle_of(SignalId(7));
        assert_eq!(world.doors()[0].bindings().solid, shared);
        assert_eq!(world.doors()[1].bindings().solid, shared);
    }

    #[test]
    fn record_only_level_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(RECORDS_FILE),
            json!([{ "type": "tile", "data": { "x": 0, "y": 0, "dx": 1, "dy": 1 } }]).to_string(),
        )
        .expect("write records");

        let sources = LevelSources::from_dir(dir.path()).expect("sources");
        assert!(sources.raster.is_none());
        let world = load_world(&sources, clock()).expect("world");
        assert_eq!(world.tiles().len(), 1);
    }

    #[test]
    fn empty_directory_is_a_startup_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = LevelSources::from_dir(dir.path()).expect_err("no sources");
        assert!(matches!(err, LevelLoadError::NoSources { .. }));
    }

    #[test]
    fn missing_door_mask_fails_fast() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_mask(&dir.path().join(TILE_MASK_FILE), &[]);
        write_mask(&dir.path().join(BUTTON_MASK_FILE), &[]);

        let err = load_level_dir(dir.path(), clock()).expect_err("missing door mask");
        match err {
            LevelLoadError::OpenImage { path, .. } => {
                assert!(path.ends_with(DOOR_MASK_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shipped_demo_level_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/levels/demo");
        let world = load_level_dir(&dir, clock()).expect("demo level");

        assert_eq!(world.platforms().len(), 1);
        assert_eq!(world.signals().len(), 1);
    }

    #[test]
    fn malformed_record_file_fails_fast() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(RECORDS_FILE), "[{ \"type\": \"tile\", ").expect("write");

        let err = load_level_dir(dir.path(), clock()).expect_err("truncated json");
        assert!(matches!(err, LevelLoadError::ParseRecords { .. }));
    }
}
