use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::sim::{
    Bindings, Entity, EntityKind, MovingPlatform, Rect, SignalHandle, SignalId, SignalRegistry,
    Vec2, World,
};

use super::types::LevelLoadError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub(crate) enum EntityRecord {
    Tile(BoxRecord),
    Door(BoxRecord),
    Button(BoxRecord),
    Platform(PlatformRecord),
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BoxRecord {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    #[serde(flatten)]
    state: StateRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlatformRecord {
    dx: f32,
    dy: f32,
    points: Vec<PointRecord>,
    speed: f32,
    #[serde(flatten)]
    state: StateRecord,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct PointRecord {
    x: f32,
    y: f32,
}

/// Signal references (`0` means unbound) and literal flag overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateRecord {
    #[serde(default)]
    state_solid: i32,
    #[serde(default)]
    state_visible: i32,
    #[serde(default)]
    state_pressed: i32,
    #[serde(default)]
    state_movable: i32,
    #[serde(default)]
    solid: Option<FlagValue>,
    #[serde(default)]
    visible: Option<FlagValue>,
    #[serde(default)]
    movable: Option<FlagValue>,
}

/// Literal flags are accepted as JSON booleans or as `0`/non-zero numbers.
/// A falsy literal leaves the entity's default in place.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    fn as_bool(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }
}

impl StateRecord {
    fn bindings(&self, signals: &mut SignalRegistry) -> Bindings {
        Bindings {
            solid: bind(signals, self.state_solid),
            visible: bind(signals, self.state_visible),
            pressed: bind(signals, self.state_pressed),
            movable: bind(signals, self.state_movable),
        }
    }

    fn apply(&self, mut entity: Entity, signals: &mut SignalRegistry) -> Entity {
        if is_set(self.solid) {
            entity = entity.with_solid(true);
        }
        if is_set(self.visible) {
            entity = entity.with_visible(true);
        }
        if is_set(self.movable) {
            entity = entity.with_movable(true);
        }
        entity.with_bindings(self.bindings(signals))
    }
}

fn is_set(flag: Option<FlagValue>) -> bool {
    flag.is_some_and(FlagValue::as_bool)
}

fn bind(signals: &mut SignalRegistry, reference: i32) -> Option<SignalHandle> {
    (reference != 0).then(|| signals.sign(SignalId(reference)))
}

pub(crate) fn parse_records(path: &Path, raw: &str) -> Result<Vec<EntityRecord>, LevelLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, Vec<EntityRecord>>(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        let source = error.into_inner();
        LevelLoadError::ParseRecords {
            path: path.to_path_buf(),
            location: if location.is_empty() {
                ".".to_string()
            } else {
                location
            },
            message: source.to_string(),
        }
    })
}

pub(crate) fn load_record_file(path: &Path, world: &mut World) -> Result<(), LevelLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelLoadError::ReadRecords {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(path, &raw)?;
    let count = records.len();
    append_records(path, records, world)?;
    debug!(path = %path.display(), count, "records_loaded");
    Ok(())
}

pub(crate) fn append_records(
    path: &Path,
    records: Vec<EntityRecord>,
    world: &mut World,
) -> Result<(), LevelLoadError> {
    for (index, record) in records.into_iter().enumerate() {
        match record {
            EntityRecord::Tile(data) => {
                let entity = box_entity(path, index, EntityKind::Tile, &data, world)?;
                world.push_tile(entity);
            }
            EntityRecord::Door(data) => {
                let entity = box_entity(path, index, EntityKind::Door, &data, world)?;
                world.push_door(entity);
            }
            EntityRecord::Button(data) => {
                let entity = box_entity(path, index, EntityKind::Button, &data, world)?;
                world.push_button(entity);
            }
            EntityRecord::Platform(data) => {
                check_size(path, index, data.dx, data.dy)?;
                let waypoints = data
                    .points
                    .iter()
                    .map(|point| Vec2::new(point.x, point.y))
                    .collect();
                let mut platform = MovingPlatform::new(data.dx, data.dy, waypoints, data.speed)
                    .map_err(|source| LevelLoadError::InvalidPlatform {
                        path: path.to_path_buf(),
                        index,
                        source,
                    })?;
                let entity = data
                    .state
                    .apply(platform.entity().clone(), world.signals_mut());
                *platform.entity_mut() = entity;
                world.push_platform(platform);
            }
        }
    }
    Ok(())
}

fn box_entity(
    path: &Path,
    index: usize,
    kind: EntityKind,
    data: &BoxRecord,
    world: &mut World,
) -> Result<Entity, LevelLoadError> {
    check_size(path, index, data.dx, data.dy)?;
    let entity = Entity::new(kind, Rect::new(data.x, data.y, data.dx, data.dy));
    Ok(data.state.apply(entity, world.signals_mut()))
}

fn check_size(path: &Path, index: usize, width: f32, height: f32) -> Result<(), LevelLoadError> {
    if width > 0.0 && height > 0.0 {
        return Ok(());
    }
    Err(LevelLoadError::InvalidSize {
        path: path.to_path_buf(),
        index,
        width,
        height,
    })
}
