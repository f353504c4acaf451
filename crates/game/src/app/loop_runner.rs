use std::process::ExitCode;

use engine::run_app;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        config,
        mut input,
        mut sink,
    } = app;

    match run_app(config, input.as_mut(), sink.as_mut()) {
        Ok(report) => {
            info!(
                ticks = report.ticks,
                frames = report.frames,
                exit = ?report.exit,
                "run_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use engine::{
        load_level_dir, run_loop, ClockMode, LoopConfig, LoopExit, Simulation, TickPolicy, Vec2,
    };
    use serde_json::json;

    use crate::app::log_sink::LogFrameSink;
    use crate::app::script::{ScriptStep, ScriptedInput};

    fn floor_level() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("Entities.json"),
            json!([
                { "type": "tile", "data": { "x": 0, "y": 10, "dx": 40, "dy": 1 } },
                { "type": "button", "data": { "x": 12, "y": 9, "dx": 1, "dy": 1,
                    "statePressed": 3, "stateVisible": 3 } },
                { "type": "door", "data": { "x": 20, "y": 7, "dx": 1, "dy": 3,
                    "stateSolid": 3 } }
            ])
            .to_string(),
        )
        .expect("write records");
        dir
    }

    #[test]
    fn scripted_run_walks_over_button_and_through_door() {
        let level = floor_level();
        let world = load_level_dir(level.path(), ClockMode::Simulation.build()).expect("world");
        let mut simulation = Simulation::new(world, Vec2::new(8.0, 8.95));
        let mut input = ScriptedInput::new(vec![ScriptStep {
            ticks: 400,
            left: false,
            right: true,
            up: false,
        }]);
        let mut sink = LogFrameSink::new(1);
        let config = LoopConfig {
            tick_policy: TickPolicy::WallClockGated {
                min_interval: std::time::Duration::ZERO,
            },
            poll_interval: std::time::Duration::ZERO,
            ..LoopConfig::default()
        };

        let report = run_loop(&config, &mut simulation, &mut input, &mut sink);

        assert_eq!(report.exit, LoopExit::QuitRequested);
        assert_eq!(report.ticks, 400);
        assert_eq!(sink.frames_logged(), 400);
        let world = simulation.world();
        assert!(!world.buttons()[0].is_visible());
        assert!(!world.doors()[0].is_solid());
        assert!(simulation.player().x > 21.0);
    }
}
