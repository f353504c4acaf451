use std::time::Duration;

use super::clock::{Clock, SimulationClock};
use super::entity::Entity;
use super::geometry::Rect;
use super::platform::MovingPlatform;
use super::signal::SignalRegistry;

/// Every entity in a level plus the signals that connect them.
///
/// Entity collections are append-only once loading finishes; simulation only
/// changes signal values and the flags derived from them.
#[derive(Debug)]
pub struct World {
    tiles: Vec<Entity>,
    doors: Vec<Entity>,
    buttons: Vec<Entity>,
    platforms: Vec<MovingPlatform>,
    signals: SignalRegistry,
    clock: Box<dyn Clock>,
}

impl Default for World {
    fn default() -> Self {
        Self::with_clock(Box::new(SimulationClock::default()))
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            tiles: Vec::new(),
            doors: Vec::new(),
            buttons: Vec::new(),
            platforms: Vec::new(),
            signals: SignalRegistry::new(),
            clock,
        }
    }

    pub fn push_tile(&mut self, tile: Entity) {
        self.tiles.push(tile);
    }

    pub fn push_door(&mut self, door: Entity) {
        self.doors.push(door);
    }

    pub fn push_button(&mut self, button: Entity) {
        self.buttons.push(button);
    }

    pub fn push_platform(&mut self, platform: MovingPlatform) {
        self.platforms.push(platform);
    }

    pub fn tiles(&self) -> &[Entity] {
        &self.tiles
    }

    pub fn doors(&self) -> &[Entity] {
        &self.doors
    }

    pub fn buttons(&self) -> &[Entity] {
        &self.buttons
    }

    pub fn platforms(&self) -> &[MovingPlatform] {
        &self.platforms
    }

    pub fn signals(&self) -> &SignalRegistry {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalRegistry {
        &mut self.signals
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn advance_clock(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    pub fn platform_box(&self, platform: &MovingPlatform) -> Rect {
        platform.motion_state(self.clock.now_ms())
    }

    /// Solid obstacle boxes in collision priority order: tiles, doors,
    /// buttons, then platforms at their current sampled position.
    pub fn solid_boxes(&self) -> impl Iterator<Item = Rect> + '_ {
        let statics = self
            .tiles
            .iter()
            .chain(self.doors.iter())
            .chain(self.buttons.iter())
            .filter(|entity| entity.is_solid())
            .map(Entity::bounds);
        let platforms = self
            .platforms
            .iter()
            .filter(|platform| platform.entity().is_solid())
            .map(move |platform| self.platform_box(platform));
        statics.chain(platforms)
    }

    /// Whether any tile (solid or not) overlaps `query`.
    pub fn any_tile_intersects(&self, query: &Rect) -> bool {
        self.tiles.iter().any(|tile| tile.bounds().intersects(query))
    }

    /// Runs [`Entity::update`] for tiles, then buttons, then doors.
    /// Platforms are not refreshed.
    pub fn update_entities(&mut self, query: &Rect) {
        let signals = &mut self.signals;
        for entity in self
            .tiles
            .iter_mut()
            .chain(self.buttons.iter_mut())
            .chain(self.doors.iter_mut())
        {
            entity.update(signals, query);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Bindings;
    use crate::sim::geometry::Vec2;
    use crate::sim::signal::SignalId;

    #[test]
    fn solid_boxes_follow_category_order_and_skip_non_solid() {
        let mut world = World::new();
        world.push_button(Entity::button(Rect::unit(9.0, 0.0)));
        world.push_door(Entity::door(Rect::unit(5.0, 0.0)));
        world.push_tile(Entity::tile(Rect::unit(1.0, 0.0)));
        world.push_tile(Entity::tile(Rect::unit(2.0, 0.0)).with_solid(false));
        world.push_platform(
            MovingPlatform::new(2.0, 1.0, vec![Vec2::new(7.0, 3.0)], 1.0).expect("platform"),
        );

        let boxes = world.solid_boxes().collect::<Vec<_>>();
        assert_eq!(
            boxes,
            vec![
                Rect::unit(1.0, 0.0),
                Rect::unit(5.0, 0.0),
                Rect::new(7.0, 3.0, 2.0, 1.0),
            ]
        );
    }

    #[test]
    fn update_entities_refreshes_bindings_but_not_platforms() {
        let mut world = World::new();
        let handle = world.signals_mut().sign(SignalId(2));
        world.push_door(Entity::door(Rect::unit(0.0, 0.0)).with_bindings(Bindings {
            solid: Some(handle),
            ..Bindings::default()
        }));
        let mut platform =
            MovingPlatform::new(1.0, 1.0, vec![Vec2::new(0.0, 0.0)], 1.0).expect("platform");
        platform.entity_mut().bindings_mut().solid = Some(handle);
        world.push_platform(platform);

        world.signals_mut().set(handle, true);
        world.update_entities(&Rect::unit(50.0, 50.0));

        assert!(!world.doors()[0].is_solid());
        assert!(world.platforms()[0].entity().is_solid());
    }

    #[test]
    fn simulation_clock_drives_platform_sampling() {
        let mut world = World::new();
        world.push_platform(
            MovingPlatform::new(
                1.0,
                1.0,
                vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)],
                1.0,
            )
            .expect("platform"),
        );
        let before = world.platform_box(&world.platforms()[0]);
        world.advance_clock(Duration::from_millis(250));
        let after = world.platform_box(&world.platforms()[0]);

        assert_eq!(before.x, 0.0);
        assert!((after.x - 2.0).abs() < 1e-4);
    }
}
