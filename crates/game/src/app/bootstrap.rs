use std::path::PathBuf;

use engine::{resolve_app_paths, AppError, LoopConfig, SceneFactory, SceneKey};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::scenes::EmberScenes;
use super::tuning::load_tuning_from_env;

const REPLAY_FLAG: &str = "--replay";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) factory: Box<dyn SceneFactory>,
    pub(crate) initial: SceneKey,
}

pub(crate) fn build_app(args: impl IntoIterator<Item = String>) -> Result<AppWiring, AppError> {
    let paths = resolve_app_paths()?;
    let tuning = load_tuning_from_env();
    let initial = initial_scene(args);
    info!(
        root = %paths.root.display(),
        recordings_dir = %paths.recordings_dir.display(),
        initial_scene = initial.label(),
        "=== Ember Arena Startup ==="
    );

    let config = LoopConfig {
        recordings_dir: paths.recordings_dir.clone(),
        ..LoopConfig::default()
    };
    Ok(AppWiring {
        config,
        factory: Box::new(EmberScenes::new(tuning, paths.recordings_dir)),
        initial,
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

/// `--replay <file>` opens that recording directly; anything else starts at the menu.
fn initial_scene(args: impl IntoIterator<Item = String>) -> SceneKey {
    let mut replay = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg != REPLAY_FLAG {
            warn!(arg = %arg, "unknown_argument_ignored");
            continue;
        }
        match args.next() {
            Some(path) => replay = Some(PathBuf::from(path)),
            None => warn!(flag = REPLAY_FLAG, "missing_argument_value"),
        }
    }
    match replay {
        Some(path) => SceneKey::Replay(Some(path)),
        None => SceneKey::MainMenu,
    }
}
