use super::entity::{Entity, EntityKind};
use super::geometry::Rect;
use super::player::{Facing, Player};
use super::world::World;

/// Width of the visible window in tiles.
pub const VIEW_TILES_X: f32 = 32.0;
/// Height of the visible window in tiles.
pub const VIEW_TILES_Y: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub kind: EntityKind,
    pub bounds: Rect,
    pub visible: bool,
}

impl EntityView {
    fn from_entity(entity: &Entity, bounds: Rect) -> Self {
        Self {
            kind: entity.kind(),
            bounds,
            visible: entity.is_visible(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub out_box: Rect,
    pub facing: Facing,
}

/// Read-only state handed to the render collaborator once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub tick: u64,
    pub entities: Vec<EntityView>,
    pub platforms: Vec<EntityView>,
    pub player: PlayerView,
    /// Tile window centred on the player.
    pub camera: Rect,
}

impl FrameView {
    pub fn capture(tick: u64, world: &World, player: &Player) -> Self {
        let entities = world
            .tiles()
            .iter()
            .chain(world.doors())
            .chain(world.buttons())
            .map(|entity| EntityView::from_entity(entity, entity.bounds()))
            .collect();
        let platforms = world
            .platforms()
            .iter()
            .map(|platform| EntityView::from_entity(platform.entity(), world.platform_box(platform)))
            .collect();

        Self {
            tick,
            entities,
            platforms,
            player: PlayerView {
                out_box: player.out_box(),
                facing: player.facing(),
            },
            camera: Rect::new(
                player.x - VIEW_TILES_X * 0.5,
                player.y - VIEW_TILES_Y * 0.5,
                VIEW_TILES_X,
                VIEW_TILES_Y,
            ),
        }
    }

    pub fn visible_entities(&self) -> impl Iterator<Item = &EntityView> {
        self.entities
            .iter()
            .chain(self.platforms.iter())
            .filter(|view| view.visible)
    }
}

/// Render collaborator fed once per polled frame.
pub trait FrameSink {
    fn present(&mut self, frame: &FrameView);
}
