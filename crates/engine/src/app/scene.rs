use std::path::PathBuf;

use crate::sim::{Arena, PhysicsSystem, SceneWorld};

use super::input::InputState;
use super::rendering::RenderBackend;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneKey {
    MainMenu,
    Game,
    /// Replay browser, or straight to playback when a log path is given.
    Replay(Option<PathBuf>),
}

impl SceneKey {
    pub fn label(&self) -> &'static str {
        match self {
            SceneKey::MainMenu => "MainMenu",
            SceneKey::Game => "Game",
            SceneKey::Replay(_) => "Replay",
        }
    }

    /// Menu and replay scenes never integrate physics.
    pub fn uses_physics(&self) -> bool {
        matches!(self, SceneKey::Game)
    }
}

/// What happens to the active recording session when switching scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPolicy {
    Keep,
    Start,
    Stop,
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo {
        key: SceneKey,
        recording: RecordingPolicy,
    },
    /// Close the current session file and open a fresh one.
    RestartRecording,
    Quit,
}

impl SceneCommand {
    pub fn switch_to(key: SceneKey) -> Self {
        SceneCommand::SwitchTo {
            key,
            recording: RecordingPolicy::Keep,
        }
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(&mut self, dt: f32, input: &InputState, world: &mut SceneWorld) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn RenderBackend);
    fn unload(&mut self, _world: &mut SceneWorld) {}
}

pub trait SceneFactory {
    fn create(&mut self, key: &SceneKey) -> Box<dyn Scene>;
}

impl<F> SceneFactory for F
where
    F: FnMut(&SceneKey) -> Box<dyn Scene>,
{
    fn create(&mut self, key: &SceneKey) -> Box<dyn Scene> {
        self(key)
    }
}

pub(crate) struct SceneRuntime {
    key: SceneKey,
    scene: Box<dyn Scene>,
    world: SceneWorld,
}

impl SceneRuntime {
    pub(crate) fn new(key: SceneKey, scene: Box<dyn Scene>, arena: Arena) -> Self {
        let world = SceneWorld::new(key.label(), arena);
        Self { key, scene, world }
    }

    pub(crate) fn key(&self) -> &SceneKey {
        &self.key
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.world.is_initialized()
    }

    /// Binds physics (for scenes that use it) and runs the load hook once.
    pub(crate) fn load(&mut self) {
        if self.world.is_initialized() {
            return;
        }
        if self.key.uses_physics() {
            self.world.bind_physics(PhysicsSystem::new(self.world.arena()));
        }
        self.scene.load(&mut self.world);
        self.world.mark_initialized();
    }

    pub(crate) fn update(&mut self, dt: f32, input: &InputState) -> SceneCommand {
        self.scene.update(dt, input, &mut self.world)
    }

    pub(crate) fn render(&mut self, renderer: &mut dyn RenderBackend) {
        self.scene.render(&self.world, renderer);
    }

    /// Unbinds physics, runs the unload hook and destroys every entity.
    pub(crate) fn teardown(&mut self) {
        self.world.unbind_physics();
        self.scene.unload(&mut self.world);
        self.world.clear();
    }
}
