use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod math;
pub mod recording;
pub mod replay;
pub mod sim;

pub use app::{
    run_app, AppError, BackendError, DrawCommand, GameLoop, HeadlessBackend, InputState, Key,
    LoopConfig, LoopMetricsSnapshot, LoopState, MouseButton, PixelsBackend, RecordingPolicy,
    RenderBackend, Scene, SceneCommand, SceneFactory, SceneKey, TEXT_ADVANCE_PX,
};
pub use math::{Color, Vec2};
pub use recording::{RecordingConfig, RecordingError, RecordingService};
pub use replay::{ReplayError, ReplayScene};
pub use sim::{Arena, Entity, EntityId, EntityKind, PhysicsSystem, SceneWorld};

pub const ROOT_ENV_VAR: &str = "EMBER_ROOT";
pub const RECORDINGS_DIR_ENV_VAR: &str = "EMBER_RECORDINGS_DIR";
pub const DEFAULT_RECORDINGS_DIR: &str = "recordings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub recordings_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("{ROOT_ENV_VAR} is set but is not a directory: {path}")]
    InvalidEnvRoot { path: PathBuf },
}

/// Root from `EMBER_ROOT` (else the working directory); recordings live in
/// `<root>/recordings` unless `EMBER_RECORDINGS_DIR` says otherwise.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_app_paths_with(|var| env::var(var))
}

fn resolve_app_paths_with(
    lookup: impl Fn(&'static str) -> Result<String, env::VarError>,
) -> Result<AppPaths, StartupError> {
    let root = match optional_var(&lookup, ROOT_ENV_VAR)? {
        Some(value) => {
            let normalized = normalize_path(Path::new(&value));
            if !normalized.is_dir() {
                return Err(StartupError::InvalidEnvRoot { path: normalized });
            }
            normalized
        }
        None => env::current_dir().map_err(StartupError::CurrentDir)?,
    };
    let recordings_dir = match optional_var(&lookup, RECORDINGS_DIR_ENV_VAR)? {
        Some(value) => {
            let path = PathBuf::from(value);
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        }
        None => root.join(DEFAULT_RECORDINGS_DIR),
    };
    Ok(AppPaths {
        root,
        recordings_dir,
    })
}

fn optional_var(
    lookup: &impl Fn(&'static str) -> Result<String, env::VarError>,
    var: &'static str,
) -> Result<Option<String>, StartupError> {
    match lookup(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(StartupError::EnvVar { var, source }),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
