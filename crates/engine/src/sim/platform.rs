use thiserror::Error;

use super::entity::{Entity, EntityKind};
use super::geometry::{Rect, Vec2};

/// Fastest accepted speed; keeps the loop period at one millisecond or more.
pub const MAX_PLATFORM_SPEED: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlatformError {
    #[error("platform needs at least one waypoint")]
    NoWaypoints,
    #[error("platform speed must be in (0, {max}], got {speed}")]
    InvalidSpeed { speed: f32, max: f32 },
    #[error("platform waypoint {index} is not finite")]
    NonFiniteWaypoint { index: usize },
}

/// A platform that loops through its waypoints, closing back to the first.
///
/// The platform's box is never stored; [`MovingPlatform::motion_state`]
/// derives it from a millisecond timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingPlatform {
    entity: Entity,
    waypoints: Vec<Vec2>,
    segment_lengths: Vec<f32>,
    total_distance: f32,
    speed: f32,
}

impl MovingPlatform {
    pub fn new(
        width: f32,
        height: f32,
        waypoints: Vec<Vec2>,
        speed: f32,
    ) -> Result<Self, PlatformError> {
        if waypoints.is_empty() {
            return Err(PlatformError::NoWaypoints);
        }
        if !speed.is_finite() || speed <= 0.0 || speed > MAX_PLATFORM_SPEED {
            return Err(PlatformError::InvalidSpeed {
                speed,
                max: MAX_PLATFORM_SPEED,
            });
        }
        if let Some(index) = waypoints
            .iter()
            .position(|point| !point.x.is_finite() || !point.y.is_finite())
        {
            return Err(PlatformError::NonFiniteWaypoint { index });
        }

        let segment_lengths = (0..waypoints.len())
            .map(|index| {
                let next = waypoints[(index + 1) % waypoints.len()];
                (waypoints[index] - next).length()
            })
            .collect::<Vec<_>>();
        let total_distance = segment_lengths.iter().sum();

        Ok(Self {
            entity: Entity::new(EntityKind::Platform, Rect::new(0.0, 0.0, width, height)),
            waypoints,
            segment_lengths,
            total_distance,
            speed,
        })
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    /// Length of one loop in milliseconds: `floor(1000 / speed)`.
    pub fn period_ms(&self) -> u64 {
        ((1000.0 / f64::from(self.speed)).floor() as u64).max(1)
    }

    /// Fraction of the loop covered at `now_ms`, in `[0, 1)`.
    pub fn phase(&self, now_ms: u64) -> f32 {
        let within_period = now_ms % self.period_ms();
        let seed = (within_period as f64 * f64::from(self.speed)) as u64 % 1000;
        seed as f32 / 1000.0
    }

    pub fn motion_state(&self, now_ms: u64) -> Rect {
        let size = self.entity.bounds();
        let mut distance = self.phase(now_ms) * self.total_distance;

        for (index, length) in self.segment_lengths.iter().copied().enumerate() {
            if distance > length {
                distance -= length;
                continue;
            }
            let start = self.waypoints[index];
            let end = self.waypoints[(index + 1) % self.waypoints.len()];
            let ratio = if length > 0.0 { distance / length } else { 0.0 };
            return Rect::from_origin_size(start + (end - start) * ratio, size.width, size.height);
        }

        // Rounding can leave a sliver past the last segment; that point is the loop start.
        Rect::from_origin_size(self.waypoints[0], size.width, size.height)
    }
}
