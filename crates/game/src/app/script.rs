use std::fs;
use std::path::{Path, PathBuf};

use engine::{InputAction, InputSnapshot, InputSource};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse input script {path} at {location}: {message}")]
    Parse {
        path: PathBuf,
        location: String,
        message: String,
    },
}

/// One run of identical key state held for `ticks` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    pub(crate) ticks: u32,
    #[serde(default)]
    pub(crate) left: bool,
    #[serde(default)]
    pub(crate) right: bool,
    #[serde(default)]
    pub(crate) up: bool,
}

impl ScriptStep {
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::empty()
            .with_action_down(InputAction::Left, self.left)
            .with_action_down(InputAction::Right, self.right)
            .with_action_down(InputAction::Up, self.up)
    }
}

/// Replays a fixed key sequence, then requests quit.
#[derive(Debug)]
pub(crate) struct ScriptedInput {
    steps: Vec<ScriptStep>,
    step_index: usize,
    ticks_into_step: u32,
}

impl ScriptedInput {
    pub(crate) fn new(steps: Vec<ScriptStep>) -> Self {
        Self {
            steps,
            step_index: 0,
            ticks_into_step: 0,
        }
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let steps = parse_steps(path, &raw)?;
        info!(
            path = %path.display(),
            steps = steps.len(),
            ticks = steps.iter().map(|step| u64::from(step.ticks)).sum::<u64>(),
            "input_script_loaded"
        );
        Ok(Self::new(steps))
    }
}

impl InputSource for ScriptedInput {
    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        while let Some(step) = self.steps.get(self.step_index) {
            if self.ticks_into_step < step.ticks {
                self.ticks_into_step += 1;
                return step.snapshot();
            }
            self.step_index += 1;
            self.ticks_into_step = 0;
            debug!(step = self.step_index, "input_script_step");
        }
        InputSnapshot::quit()
    }
}

/// No keys held, never quits. Used when no script is configured.
#[derive(Debug, Default)]
pub(crate) struct IdleInput;

impl InputSource for IdleInput {
    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        InputSnapshot::empty()
    }
}

fn parse_steps(path: &Path, raw: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, Vec<ScriptStep>>(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        let source = error.into_inner();
        ScriptError::Parse {
            path: path.to_path_buf(),
            location,
            message: source.to_string(),
        }
    })
}
