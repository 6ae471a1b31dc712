use std::path::PathBuf;

use engine::{ReplayScene, Scene, SceneFactory, SceneKey};

use super::gameplay::build_game_scene;
use super::menu::MenuScene;
use super::tuning::GameTuning;

/// Builds a fresh scene each time the loop switches to `key`.
pub(crate) struct EmberScenes {
    tuning: GameTuning,
    recordings_dir: PathBuf,
}

impl EmberScenes {
    pub(crate) fn new(tuning: GameTuning, recordings_dir: PathBuf) -> Self {
        Self {
            tuning,
            recordings_dir,
        }
    }
}

impl SceneFactory for EmberScenes {
    fn create(&mut self, key: &SceneKey) -> Box<dyn Scene> {
        match key {
            SceneKey::MainMenu => Box::new(MenuScene::new()),
            SceneKey::Game => build_game_scene(self.tuning.clone()),
            SceneKey::Replay(path) => {
                Box::new(ReplayScene::new(path.clone(), self.recordings_dir.clone()))
            }
        }
    }
}
