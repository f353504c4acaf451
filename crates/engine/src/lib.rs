use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod level;
pub mod sim;

pub use app::{
    run_app, run_loop, AppError, InputAction, InputSnapshot, InputSource, LoopConfig, LoopExit,
    LoopMetricsSnapshot, LoopReport, TickPolicy, MIN_TICK_INTERVAL,
};
pub use level::{load_level_dir, load_world, LevelLoadError, LevelSources, LevelSummary};
pub use sim::{
    ClockMode, Entity, EntityKind, FrameSink, FrameView, MovingPlatform, Player, Rect, SignalId,
    SignalRegistry, Simulation, Vec2, World, DEFAULT_PLAYER_SPAWN,
};

pub const ROOT_ENV_VAR: &str = "PLATFORMER_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub levels_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "PLATFORMER_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/platformer\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let levels_dir = root.join("assets").join("levels");
        Self { root, levels_dir }
    }
}

/// Uses `PLATFORMER_ROOT` when set, otherwise the nearest ancestor of the
/// executable that looks like the project root.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = match root_from_env()? {
        Some(root) => root,
        None => {
            let exe_dir = executable_dir()?;
            find_root_above(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: canonical_or_raw(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })?
        }
    };
    Ok(AppPaths::from_root(root))
}

fn root_from_env() -> Result<Option<PathBuf>, StartupError> {
    let raw = match env::var(ROOT_ENV_VAR) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(source) => {
            return Err(StartupError::EnvVar {
                var: ROOT_ENV_VAR,
                source,
            })
        }
    };
    let root = canonical_or_raw(Path::new(&raw));
    if looks_like_project_root(&root) {
        Ok(Some(root))
    } else {
        Err(StartupError::InvalidEnvRoot { path: root })
    }
}

fn executable_dir() -> Result<PathBuf, StartupError> {
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Err(StartupError::ExeHasNoParent(exe)),
    }
}

fn find_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| looks_like_project_root(dir))
        .map(canonical_or_raw)
}

/// A `Cargo.toml` next to either `crates/` or `assets/`.
fn looks_like_project_root(dir: &Path) -> bool {
    dir.join("Cargo.toml").is_file() && (dir.join("crates").is_dir() || dir.join("assets").is_dir())
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
