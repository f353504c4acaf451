use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time source for platform phase, in milliseconds.
pub trait Clock: fmt::Debug {
    fn now_ms(&self) -> u64;

    /// Called once per simulation tick with the tick's duration.
    fn advance(&mut self, _dt: Duration) {}
}

/// Milliseconds since the Unix epoch. Platforms sharing waypoints and speed
/// stay in phase regardless of when they were loaded, but motion cannot be
/// replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Simulation time accumulated from ticks. Deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    elapsed: Duration,
}

impl SimulationClock {
    pub fn starting_at(elapsed_ms: u64) -> Self {
        Self {
            elapsed: Duration::from_millis(elapsed_ms),
        }
    }
}

impl Clock for SimulationClock {
    fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockMode {
    WallClock,
    #[default]
    Simulation,
}

impl ClockMode {
    pub fn build(self) -> Box<dyn Clock> {
        match self {
            Self::WallClock => Box::new(SystemClock),
            Self::Simulation => Box::new(SimulationClock::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_clock_accumulates_ticks() {
        let mut clock = SimulationClock::default();
        clock.advance(Duration::from_millis(4));
        clock.advance(Duration::from_millis(4));
        assert_eq!(clock.now_ms(), 8);
    }

    #[test]
    fn system_clock_ignores_advance() {
        let mut clock = SystemClock;
        let before = clock.now_ms();
        clock.advance(Duration::from_secs(3600));
        assert!(clock.now_ms() < before + 3_600_000);
    }
}
