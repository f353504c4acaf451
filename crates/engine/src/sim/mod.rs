mod clock;
mod entity;
mod geometry;
mod platform;
mod player;
mod signal;
mod simulation;
mod view;
mod world;

pub use clock::{Clock, ClockMode, SimulationClock, SystemClock};
pub use entity::{Bindings, Entity, EntityKind};
pub use geometry::{Rect, Vec2};
pub use platform::{MovingPlatform, PlatformError, MAX_PLATFORM_SPEED};
pub use player::{Facing, Player, COLLISION_MARGIN};
pub use signal::{SignalHandle, SignalId, SignalRegistry};
pub use simulation::{Simulation, DEFAULT_PLAYER_SPAWN};
pub use view::{EntityView, FrameSink, FrameView, PlayerView, VIEW_TILES_X, VIEW_TILES_Y};
pub use world::World;
