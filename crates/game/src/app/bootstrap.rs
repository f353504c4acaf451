use std::env;
use std::path::PathBuf;
use std::time::Duration;

use engine::{ClockMode, FrameSink, InputSource, LoopConfig, TickPolicy};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::log_sink::LogFrameSink;
use super::script::{IdleInput, ScriptError, ScriptedInput};

const LEVEL_ENV_VAR: &str = "PLATFORMER_LEVEL";
const MAX_TICKS_ENV_VAR: &str = "PLATFORMER_MAX_TICKS";
const INPUT_SCRIPT_ENV_VAR: &str = "PLATFORMER_INPUT_SCRIPT";
const WALL_CLOCK_PLATFORMS_ENV_VAR: &str = "PLATFORMER_WALL_CLOCK_PLATFORMS";
const FIXED_STEP_TPS_ENV_VAR: &str = "PLATFORMER_FIXED_STEP_TPS";

const FIXED_STEP_MAX_TICKS_PER_FRAME: u32 = 5;
const FIXED_STEP_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) input: Box<dyn InputSource>,
    pub(crate) sink: Box<dyn FrameSink>,
}

#[derive(Debug)]
struct EnvSettings {
    config: LoopConfig,
    input_script: Option<PathBuf>,
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    info!("=== Platformer Startup ===");

    let settings = settings_from_lookup(|var| env::var(var).ok())?;
    let input: Box<dyn InputSource> = match &settings.input_script {
        Some(path) => Box::new(ScriptedInput::load(path)?),
        None => Box::new(IdleInput),
    };
    info!(
        level = %settings.config.level_name,
        scripted_input = settings.input_script.is_some(),
        "config_resolved"
    );

    Ok(AppWiring {
        config: settings.config,
        input,
        sink: Box::new(LogFrameSink::default()),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn settings_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<EnvSettings, BootstrapError> {
    let read = |var: &str| {
        lookup(var)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
    };
    let mut config = LoopConfig::default();

    if let Some(level) = read(LEVEL_ENV_VAR) {
        config.level_name = level;
    }
    if let Some(raw) = read(MAX_TICKS_ENV_VAR) {
        config.max_ticks = Some(raw.parse::<u64>().map_err(|_| BootstrapError::InvalidValue {
            var: MAX_TICKS_ENV_VAR,
            value: raw.clone(),
            expected: "a non-negative integer",
        })?);
    }
    if let Some(raw) = read(WALL_CLOCK_PLATFORMS_ENV_VAR) {
        if parse_flag(WALL_CLOCK_PLATFORMS_ENV_VAR, &raw)? {
            config.clock_mode = ClockMode::WallClock;
        }
    }
    if let Some(raw) = read(FIXED_STEP_TPS_ENV_VAR) {
        let target_tps = raw
            .parse::<u32>()
            .ok()
            .filter(|tps| *tps > 0)
            .ok_or_else(|| BootstrapError::InvalidValue {
                var: FIXED_STEP_TPS_ENV_VAR,
                value: raw.clone(),
                expected: "a positive integer",
            })?;
        config.tick_policy = TickPolicy::FixedStep {
            target_tps,
            max_ticks_per_frame: FIXED_STEP_MAX_TICKS_PER_FRAME,
            max_frame_delta: FIXED_STEP_MAX_FRAME_DELTA,
        };
    }

    Ok(EnvSettings {
        config,
        input_script: read(INPUT_SCRIPT_ENV_VAR).map(PathBuf::from),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, BootstrapError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BootstrapError::InvalidValue {
            var,
            value: raw.to_string(),
            expected: "a boolean flag",
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<EnvSettings, BootstrapError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        settings_from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = settings(&[]).expect("settings");

        assert_eq!(settings.config.level_name, "demo");
        assert_eq!(settings.config.max_ticks, None);
        assert_eq!(settings.config.clock_mode, ClockMode::Simulation);
        assert_eq!(settings.config.tick_policy, TickPolicy::default());
        assert!(settings.input_script.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let settings = settings(&[
            (LEVEL_ENV_VAR, " castle "),
            (MAX_TICKS_ENV_VAR, "600"),
            (INPUT_SCRIPT_ENV_VAR, "scripts/run.json"),
            (WALL_CLOCK_PLATFORMS_ENV_VAR, "yes"),
            (FIXED_STEP_TPS_ENV_VAR, "120"),
        ])
        .expect("settings");

        assert_eq!(settings.config.level_name, "castle");
        assert_eq!(settings.config.max_ticks, Some(600));
        assert_eq!(settings.config.clock_mode, ClockMode::WallClock);
        assert_eq!(
            settings.input_script,
            Some(PathBuf::from("scripts/run.json"))
        );
        assert!(matches!(
            settings.config.tick_policy,
            TickPolicy::FixedStep {
                target_tps: 120,
                ..
            }
        ));
    }

    #[test]
    fn blank_values_are_ignored() {
        let settings = settings(&[(LEVEL_ENV_VAR, "  "), (MAX_TICKS_ENV_VAR, "")])
            .expect("settings");
        assert_eq!(settings.config.level_name, "demo");
        assert_eq!(settings.config.max_ticks, None);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = settings(&[(MAX_TICKS_ENV_VAR, "lots")]).expect_err("bad max ticks");
        assert!(matches!(
            err,
            BootstrapError::InvalidValue {
                var: MAX_TICKS_ENV_VAR,
                ..
            }
        ));

        let err = settings(&[(FIXED_STEP_TPS_ENV_VAR, "0")]).expect_err("zero tps");
        assert!(matches!(
            err,
            BootstrapError::InvalidValue {
                var: FIXED_STEP_TPS_ENV_VAR,
                ..
            }
        ));
    }

    #[test]
    fn flag_parsing_accepts_common_spellings() {
        assert!(parse_flag(WALL_CLOCK_PLATFORMS_ENV_VAR, "TRUE").expect("flag"));
        assert!(!parse_flag(WALL_CLOCK_PLATFORMS_ENV_VAR, "off").expect("flag"));
        assert!(parse_flag(WALL_CLOCK_PLATFORMS_ENV_VAR, "maybe").is_err());
    }
}
