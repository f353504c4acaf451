use std::time::Duration;

use crate::app::InputSnapshot;

use super::geometry::Vec2;
use super::player::Player;
use super::view::FrameView;
use super::world::World;

/// Default spawn point in tiles.
pub const DEFAULT_PLAYER_SPAWN: Vec2 = Vec2 { x: 8.0, y: 8.0 };

/// A loaded world plus the player moving through it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    player: Player,
    tick_count: u64,
}

impl Simulation {
    pub fn new(world: World, spawn: Vec2) -> Self {
        Self {
            world,
            player: Player::spawn_at(spawn),
            tick_count: 0,
        }
    }

    /// Runs one tick and advances the world clock by `dt`.
    pub fn step(&mut self, input: &InputSnapshot, dt: Duration) {
        self.player.tick(&mut self.world, input);
        self.world.advance_clock(dt);
        self.tick_count = self.tick_count.saturating_add(1);
    }

    pub fn frame_view(&self) -> FrameView {
        FrameView::capture(self.tick_count, &self.world, &self.player)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
