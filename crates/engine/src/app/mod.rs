mod input;
mod loop_runner;
mod metrics;

pub use input::{InputAction, InputSnapshot, InputSource};
pub use loop_runner::{
    run_app, run_loop, AppError, LoopConfig, LoopExit, LoopReport, TickPolicy, MIN_TICK_INTERVAL,
};
pub use metrics::LoopMetricsSnapshot;
