use crate::app::{InputAction, InputSnapshot};

use super::geometry::{Rect, Vec2};
use super::world::World;

/// Extra separation added when pushing the player out of an obstacle.
pub const COLLISION_MARGIN: f32 = 0.05;

const RUN_ACCELERATION: f32 = 0.01;
const MAX_RUN_SPEED: f32 = 0.35;
const RUN_DAMPING: f32 = 0.9;
const JUMP_VELOCITY: f32 = -0.18;
const GRAVITY: f32 = 0.003;
const MAX_FALL_SPEED: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Player kinematic state in tile units. `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Player {
    pub fn spawn_at(position: Vec2) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Collision box, inset from the drawn tile.
    pub fn hit_box(&self) -> Rect {
        Rect::new(self.x + 0.1, self.y + 0.2, 0.8, 0.8)
    }

    /// Full tile the player is drawn into.
    pub fn out_box(&self) -> Rect {
        Rect::unit(self.x, self.y)
    }

    /// Thin strip under the feet used for ground checks.
    pub fn under_box(&self) -> Rect {
        Rect::new(self.x + 0.1, self.y + 1.0, 0.8, 0.01)
    }

    pub fn facing(&self) -> Facing {
        if self.vx >= 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn tick(&mut self, world: &mut World, input: &InputSnapshot) {
        if self.vx > -MAX_RUN_SPEED && input.is_down(InputAction::Left) {
            self.vx -= RUN_ACCELERATION;
        }
        if self.vx < MAX_RUN_SPEED && input.is_down(InputAction::Right) {
            self.vx += RUN_ACCELERATION;
        }
        self.vx *= RUN_DAMPING;

        if input.is_down(InputAction::Up) {
            self.try_jump(world);
        }
        if self.vy < MAX_FALL_SPEED {
            self.vy += GRAVITY;
        }

        // Positional correction before moving, then per-axis move and resolve.
        self.resolve_horizontal(world);
        self.resolve_vertical(world);
        self.move_vertically(world);
        self.move_horizontally(world);

        world.update_entities(&self.hit_box());
    }

    /// Ground check looks at tiles only; doors, buttons and platforms never
    /// allow a jump.
    fn try_jump(&mut self, world: &World) {
        if self.vy >= 0.0 && world.any_tile_intersects(&self.under_box()) {
            self.vy = JUMP_VELOCITY;
        }
    }

    /// Applies `vy`, resolves, and stops vertical motion on contact.
    pub fn move_vertically(&mut self, world: &World) -> bool {
        self.y += self.vy;
        let hit = self.resolve_vertical(world);
        if hit {
            self.vy = 0.0;
        }
        hit
    }

    pub fn move_horizontally(&mut self, world: &World) -> bool {
        self.x += self.vx;
        self.resolve_horizontal(world)
    }

    /// Pushes the player out of the first intersecting solid box along y.
    pub fn resolve_vertical(&mut self, world: &World) -> bool {
        for obstacle in world.solid_boxes() {
            if self.collide_vertical(&obstacle) {
                return true;
            }
        }
        false
    }

    /// Pushes the player out of the first intersecting solid box along x.
    pub fn resolve_horizontal(&mut self, world: &World) -> bool {
        for obstacle in world.solid_boxes() {
            if self.collide_horizontal(&obstacle) {
                return true;
            }
        }
        false
    }

    pub fn collide_vertical(&mut self, obstacle: &Rect) -> bool {
        let body = self.hit_box();
        if !obstacle.intersects(&body) {
            return false;
        }
        if obstacle.center().y > body.center().y {
            self.y -= body.bottom() - obstacle.top() + COLLISION_MARGIN;
        } else {
            self.y += obstacle.bottom() - body.top() + COLLISION_MARGIN;
        }
        true
    }

    pub fn collide_horizontal(&mut self, obstacle: &Rect) -> bool {
        let body = self.hit_box();
        if !obstacle.intersects(&body) {
            return false;
        }
        if obstacle.center().x > body.center().x {
            self.x -= body.right() - obstacle.left() + COLLISION_MARGIN;
        } else {
            self.x += obstacle.right() - body.left() + COLLISION_MARGIN;
        }
        true
    }
}
