use engine::{FrameSink, FrameView};
use tracing::debug;

pub(crate) const DEFAULT_LOG_EVERY_TICKS: u64 = 60;

/// Stands in for a renderer: emits a `frame` event for every
/// `every_ticks`-th simulated tick. Repeated frames of one tick are skipped.
#[derive(Debug)]
pub(crate) struct LogFrameSink {
    every_ticks: u64,
    last_logged_tick: Option<u64>,
    frames_logged: u64,
}

impl LogFrameSink {
    pub(crate) fn new(every_ticks: u64) -> Self {
        Self {
            every_ticks: every_ticks.max(1),
            last_logged_tick: None,
            frames_logged: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn frames_logged(&self) -> u64 {
        self.frames_logged
    }

    fn should_log(&self, tick: u64) -> bool {
        tick % self.every_ticks == 0 && self.last_logged_tick != Some(tick)
    }
}

impl Default for LogFrameSink {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_EVERY_TICKS)
    }
}

impl FrameSink for LogFrameSink {
    fn present(&mut self, frame: &FrameView) {
        if !self.should_log(frame.tick) {
            return;
        }
        self.last_logged_tick = Some(frame.tick);
        self.frames_logged += 1;

        let on_screen = frame
            .visible_entities()
            .filter(|view| view.bounds.intersects(&frame.camera))
            .count();
        let player = frame.player.out_box;
        debug!(
            tick = frame.tick,
            player_x = player.x,
            player_y = player.y,
            facing = ?frame.player.facing,
            on_screen,
            logged = self.frames_logged,
            "frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use engine::{Simulation, Vec2, World};

    use super::*;

    fn frame_at(tick: u64) -> FrameView {
        let simulation = Simulation::new(World::new(), Vec2::new(8.0, 8.0));
        FrameView {
            tick,
            ..simulation.frame_view()
        }
    }

    #[test]
    fn logs_every_nth_tick_once() {
        let mut sink = LogFrameSink::new(2);
        for tick in [0, 0, 1, 2, 2, 3, 4] {
            sink.present(&frame_at(tick));
        }
        assert_eq!(sink.frames_logged(), 3);
    }

    #[test]
    fn zero_interval_logs_every_tick() {
        let mut sink = LogFrameSink::new(0);
        for tick in 1..=5 {
            sink.present(&frame_at(tick));
        }
        assert_eq!(sink.frames_logged(), 5);
    }
}
