use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::level::{load_level_dir, LevelLoadError};
use crate::sim::{ClockMode, FrameSink, Simulation, Vec2, DEFAULT_PLAYER_SPAWN};
use crate::{resolve_app_paths, StartupError};

use super::input::InputSource;
use super::metrics::MetricsAccumulator;

/// Minimum wall-clock gap between two ticks under the gated policy.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPolicy {
    /// At most one tick per poll, once `min_interval` has passed since the last.
    WallClockGated { min_interval: Duration },
    /// Fixed-duration ticks covering the elapsed time, capped per poll.
    FixedStep {
        target_tps: u32,
        max_ticks_per_frame: u32,
        max_frame_delta: Duration,
    },
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self::WallClockGated {
            min_interval: MIN_TICK_INTERVAL,
        }
    }
}

impl TickPolicy {
    /// Simulation time credited to the world clock per tick.
    pub fn tick_duration(&self) -> Duration {
        match *self {
            Self::WallClockGated { min_interval } => {
                normalize_non_zero_duration(min_interval, MIN_TICK_INTERVAL)
            }
            Self::FixedStep { target_tps, .. } => fixed_dt_for(target_tps),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub level_name: String,
    pub tick_policy: TickPolicy,
    pub max_ticks: Option<u64>,
    pub poll_interval: Duration,
    pub metrics_log_interval: Duration,
    pub player_spawn: Vec2,
    pub clock_mode: ClockMode,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            level_name: "demo".to_string(),
            tick_policy: TickPolicy::default(),
            max_ticks: None,
            poll_interval: Duration::from_millis(1),
            metrics_log_interval: Duration::from_secs(1),
            player_spawn: DEFAULT_PLAYER_SPAWN,
            clock_mode: ClockMode::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load level: {0}")]
    Level(#[from] LevelLoadError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    QuitRequested,
    TickLimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    pub ticks: u64,
    pub frames: u64,
    pub exit: LoopExit,
}

/// Resolves the project root, loads the configured level and runs it.
pub fn run_app(
    config: LoopConfig,
    input: &mut dyn InputSource,
    sink: &mut dyn FrameSink,
) -> Result<LoopReport, AppError> {
    let app_paths = resolve_app_paths()?;
    let level_dir = app_paths.levels_dir.join(&config.level_name);
    info!(
        root = %app_paths.root.display(),
        level_dir = %level_dir.display(),
        clock_mode = ?config.clock_mode,
        "startup"
    );

    let world = load_level_dir(&level_dir, config.clock_mode.build())?;
    let mut simulation = Simulation::new(world, config.player_spawn);
    Ok(run_loop(&config, &mut simulation, input, sink))
}

/// Polls until the input source asks to quit or the tick limit is reached.
/// Every poll presents one frame, whether or not a tick ran.
pub fn run_loop(
    config: &LoopConfig,
    simulation: &mut Simulation,
    input: &mut dyn InputSource,
    sink: &mut dyn FrameSink,
) -> LoopReport {
    let start = Instant::now();
    let tick_dt = config.tick_policy.tick_duration();
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let mut scheduler = TickScheduler::new(config.tick_policy, start);
    let mut metrics = MetricsAccumulator::new(metrics_log_interval, start);
    let mut last_frame_instant = start;
    let mut frames = 0u64;
    let start_tick = simulation.tick_count();

    info!(
        tick_policy = ?config.tick_policy,
        tick_ms = tick_dt.as_millis() as u64,
        max_ticks = ?config.max_ticks,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        "loop_config"
    );

    let exit = loop {
        let now = Instant::now();
        let frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;

        let plan = scheduler.plan(now);
        if plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                ticks_to_run = plan.ticks_to_run,
                "sim_clamp_triggered"
            );
        }

        let mut ticks_run = 0u32;
        let mut exit = None;
        for _ in 0..plan.ticks_to_run {
            if tick_limit_reached(config, simulation, start_tick) {
                break;
            }
            let snapshot = input.snapshot_for_tick();
            if snapshot.quit_requested() {
                exit = Some(LoopExit::QuitRequested);
                break;
            }
            simulation.step(&snapshot, tick_dt);
            ticks_run += 1;
        }
        if exit.is_none() && tick_limit_reached(config, simulation, start_tick) {
            exit = Some(LoopExit::TickLimitReached);
        }

        sink.present(&simulation.frame_view());
        frames += 1;
        metrics.record_frame(frame_dt, ticks_run);
        if let Some(snapshot) = metrics.maybe_snapshot(now) {
            let player = simulation.player();
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                idle_poll_ratio = snapshot.idle_poll_ratio,
                tick = simulation.tick_count(),
                player_x = player.x,
                player_y = player.y,
                "loop_metrics"
            );
        }

        if let Some(exit) = exit {
            break exit;
        }
        if ticks_run == 0 && config.poll_interval > Duration::ZERO {
            thread::sleep(config.poll_interval);
        }
    };

    let ticks = simulation.tick_count() - start_tick;
    info!(ticks, frames, exit = ?exit, "shutdown");
    LoopReport {
        ticks,
        frames,
        exit,
    }
}

fn tick_limit_reached(config: &LoopConfig, simulation: &Simulation, start_tick: u64) -> bool {
    config
        .max_ticks
        .is_some_and(|limit| simulation.tick_count() - start_tick >= limit)
}

#[derive(Debug)]
struct TickScheduler {
    policy: TickPolicy,
    last_tick: Instant,
    last_poll: Instant,
    accumulator: Duration,
}

impl TickScheduler {
    fn new(policy: TickPolicy, now: Instant) -> Self {
        Self {
            policy,
            last_tick: now,
            last_poll: now,
            accumulator: Duration::ZERO,
        }
    }

    fn plan(&mut self, now: Instant) -> StepPlan {
        match self.policy {
            TickPolicy::WallClockGated { min_interval } => {
                if !gate_open(self.last_tick, now, min_interval) {
                    return StepPlan::idle();
                }
                self.last_tick = now;
                StepPlan {
                    ticks_to_run: 1,
                    remaining_accumulator: Duration::ZERO,
                    dropped_backlog: Duration::ZERO,
                }
            }
            TickPolicy::FixedStep {
                target_tps,
                max_ticks_per_frame,
                max_frame_delta,
            } => {
                let raw_dt = now.saturating_duration_since(self.last_poll);
                self.last_poll = now;
                let max_frame_delta =
                    normalize_non_zero_duration(max_frame_delta, Duration::from_millis(250));
                self.accumulator = self
                    .accumulator
                    .saturating_add(clamp_frame_delta(raw_dt, max_frame_delta));
                let plan = plan_sim_steps(
                    self.accumulator,
                    fixed_dt_for(target_tps),
                    max_ticks_per_frame.max(1),
                );
                self.accumulator = plan.remaining_accumulator;
                plan
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

impl StepPlan {
    fn idle() -> Self {
        Self {
            ticks_to_run: 0,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn gate_open(last_tick: Instant, now: Instant, min_interval: Duration) -> bool {
    now.saturating_duration_since(last_tick) >= min_interval
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn fixed_dt_for(target_tps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / target_tps.max(1) as f64)
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
