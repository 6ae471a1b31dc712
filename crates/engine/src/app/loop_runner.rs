use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use thiserror::Error;
use tracing::{info, warn};

use crate::recording::{
    delete_recording, unique_session_path, RecordingConfig, RecordingError, RecordingService,
};
use crate::sim::{Arena, SceneWorld};
use crate::StartupError;

use super::input::InputState;
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};
use super::rendering::{BackendError, PixelsBackend, RenderBackend};
use super::scene::{RecordingPolicy, SceneCommand, SceneFactory, SceneKey, SceneRuntime};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Sleep between loop iterations.
    pub idle_sleep: Duration,
    pub metrics_log_interval: Duration,
    pub recordings_dir: PathBuf,
    /// Seconds between recorded keyframes; `0.0` records every executed frame.
    pub keyframe_interval: f32,
    pub flush_every: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Ember Arena".to_string(),
            window_width: 800,
            window_height: 600,
            target_fps: 60,
            idle_sleep: Duration::from_millis(1),
            metrics_log_interval: Duration::from_secs(1),
            recordings_dir: PathBuf::from("recordings"),
            keyframe_interval: 0.0,
            flush_every: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Opens the window and runs `initial` until the window closes or a scene quits.
pub fn run_app(
    config: LoopConfig,
    factory: Box<dyn SceneFactory>,
    initial: SceneKey,
) -> Result<(), AppError> {
    let backend = PixelsBackend::new(
        &config.window_title,
        config.window_width,
        config.window_height,
    )?;
    let mut game_loop = GameLoop::new(config, backend, factory);
    game_loop.set_scene(initial);
    game_loop.run();
    Ok(())
}

/// Single-threaded frame scheduler.
///
/// Owns the backend, the input state, the active scene and at most one
/// recording session. Each executed frame runs, in order: scene update,
/// physics pass, recording, scene command, input latch; then render.
pub struct GameLoop<B: RenderBackend> {
    config: LoopConfig,
    backend: B,
    input: InputState,
    factory: Box<dyn SceneFactory>,
    active: Option<SceneRuntime>,
    state: LoopState,
    recording: Option<RecordingService>,
    frame_interval: Duration,
    last_frame: Option<Instant>,
    last_update: Instant,
    delta_time: f32,
    metrics: MetricsAccumulator,
    last_metrics: Option<LoopMetricsSnapshot>,
    cleaned_up: bool,
}

impl<B: RenderBackend> GameLoop<B> {
    pub fn new(config: LoopConfig, backend: B, factory: Box<dyn SceneFactory>) -> Self {
        let target_fps = config.target_fps.max(1);
        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(target_fps));
        let now = Instant::now();
        let metrics = MetricsAccumulator::new(
            normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1)),
            now,
        );
        Self {
            config,
            backend,
            input: InputState::default(),
            factory,
            active: None,
            state: LoopState::Stopped,
            recording: None,
            frame_interval,
            last_frame: None,
            last_update: now,
            delta_time: 0.0,
            metrics,
            last_metrics: None,
            cleaned_up: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Seconds covered by the most recent update.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn last_metrics(&self) -> Option<LoopMetricsSnapshot> {
        self.last_metrics
    }

    pub fn active_scene(&self) -> Option<&SceneKey> {
        self.active.as_ref().map(SceneRuntime::key)
    }

    pub fn world(&self) -> Option<&SceneWorld> {
        self.active.as_ref().map(SceneRuntime::world)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn recording_path(&self) -> Option<&Path> {
        self.recording.as_ref().map(RecordingService::path)
    }

    pub fn run(&mut self) {
        if self.is_running() {
            return;
        }
        self.state = LoopState::Running;
        self.cleaned_up = false;
        let now = Instant::now();
        self.last_update = now;
        self.last_frame = None;
        self.metrics = MetricsAccumulator::new(
            normalize_non_zero_duration(self.config.metrics_log_interval, Duration::from_secs(1)),
            now,
        );
        info!(
            target_fps = self.config.target_fps.max(1),
            idle_sleep_ms = self.config.idle_sleep.as_millis() as u64,
            metrics_log_interval_ms = self.config.metrics_log_interval.as_millis() as u64,
            recordings_dir = %self.config.recordings_dir.display(),
            "loop_config"
        );

        if let Some(runtime) = self.active.as_mut() {
            if !runtime.is_loaded() {
                runtime.load();
                info!(
                    scene = runtime.key().label(),
                    entity_count = runtime.world().entity_count(),
                    "scene_loaded"
                );
            }
        }

        while self.is_running() {
            let now = Instant::now();
            let frame_due = self
                .last_frame
                .map_or(true, |last| now.saturating_duration_since(last) >= self.frame_interval);
            if frame_due {
                self.update();
                if self.is_running() {
                    self.render();
                }
                self.last_frame = Some(now);
            }

            if self.is_running() {
                self.backend.poll_events(&mut self.input);
            }
            if self.backend.should_close() {
                self.stop();
            }
            if !self.config.idle_sleep.is_zero() {
                thread::sleep(self.config.idle_sleep);
            }
        }

        self.cleanup();
    }

    /// Asks the loop to exit; observed at the top of the next iteration.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Replaces the active scene. The previous scene is torn down first; the
    /// new one is loaded now only if the loop is running, else when it starts.
    pub fn set_scene(&mut self, key: SceneKey) {
        let previous = self.active.take().map(|mut runtime| {
            runtime.teardown();
            runtime.key().label()
        });

        let scene = self.factory.create(&key);
        let arena = Arena::from_viewport(self.backend.width(), self.backend.height());
        let mut runtime = SceneRuntime::new(key, scene, arena);
        if self.is_running() {
            runtime.load();
        }
        info!(
            from = previous.unwrap_or("none"),
            scene = runtime.key().label(),
            loaded = runtime.is_loaded(),
            entity_count = runtime.world().entity_count(),
            "scene_switched"
        );
        self.active = Some(runtime);
    }

    /// Starts a new session file, closing any session already open.
    pub fn enable_recording(&mut self) -> Result<(), RecordingError> {
        self.disable_recording();
        let config = RecordingConfig {
            path: unique_session_path(&self.config.recordings_dir, SystemTime::now()),
            keyframe_interval: self.config.keyframe_interval.max(0.0),
            flush_every: self.config.flush_every,
        };
        let service = match self.active.as_ref() {
            Some(runtime) => RecordingService::start(config, runtime.world())?,
            None => {
                let empty = SceneWorld::new(
                    "Empty",
                    Arena::from_viewport(self.backend.width(), self.backend.height()),
                );
                RecordingService::start(config, &empty)?
            }
        };
        self.recording = Some(service);
        Ok(())
    }

    /// Stops the session and keeps its file.
    pub fn disable_recording(&mut self) {
        if let Some(mut service) = self.recording.take() {
            if let Err(error) = service.stop() {
                warn!(error = %error, "recording_stop_failed");
            }
        }
    }

    /// Stops the session and deletes its file.
    pub fn discard_recording(&mut self) {
        let Some(mut service) = self.recording.take() else {
            return;
        };
        if let Err(error) = service.stop() {
            warn!(error = %error, "recording_stop_failed");
        }
        let path = service.path().to_path_buf();
        drop(service);
        match delete_recording(&path) {
            Ok(_) => info!(path = %path.display(), "recording_discarded"),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "recording_delete_failed")
            }
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_update).as_secs_f32();
        self.last_update = now;
        self.update_with_delta(dt);
    }

    pub(crate) fn update_with_delta(&mut self, dt: f32) {
        self.delta_time = dt;
        let command = match self.active.as_mut() {
            Some(runtime) => {
                let command = runtime.update(dt, &self.input);
                runtime.world_mut().step_physics(dt);
                command
            }
            None => SceneCommand::None,
        };

        let recording_failure = match (self.recording.as_mut(), self.active.as_ref()) {
            (Some(service), Some(runtime)) => service.update(dt, runtime.world()).err(),
            _ => None,
        };
        if let Some(error) = recording_failure {
            warn!(error = %error, "recording_failed");
            self.disable_recording();
        }

        self.apply_command(command);
        self.input.update();
    }

    fn apply_command(&mut self, command: SceneCommand) {
        match command {
            SceneCommand::None => {}
            SceneCommand::Quit => {
                info!(reason = "scene_quit", "shutdown_requested");
                self.stop();
            }
            SceneCommand::RestartRecording => {
                self.disable_recording();
                self.start_recording_logged();
            }
            SceneCommand::SwitchTo { key, recording } => {
                match recording {
                    RecordingPolicy::Keep | RecordingPolicy::Start => {}
                    RecordingPolicy::Stop => self.disable_recording(),
                    RecordingPolicy::Discard => self.discard_recording(),
                }
                self.set_scene(key);
                if recording == RecordingPolicy::Start {
                    self.start_recording_logged();
                }
            }
        }
    }

    fn start_recording_logged(&mut self) {
        if let Err(error) = self.enable_recording() {
            warn!(error = %error, "recording_start_failed");
        }
    }

    fn render(&mut self) {
        self.backend.begin_frame();
        if let Some(runtime) = self.active.as_mut() {
            runtime.render(&mut self.backend);
        }
        self.backend.end_frame();

        self.metrics
            .record_frame(Duration::from_secs_f32(self.delta_time.max(0.0)));
        if let Some(snapshot) = self.metrics.maybe_snapshot(Instant::now()) {
            self.last_metrics = Some(snapshot);
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                entity_count = self.world().map_or(0, SceneWorld::entity_count),
                scene = self.active_scene().map_or("none", SceneKey::label),
                "loop_metrics"
            );
        }
    }

    fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        self.disable_recording();
        if let Some(runtime) = self.active.as_mut() {
            runtime.teardown();
        }
        self.backend.cleanup();
        self.state = LoopState::Stopped;
        info!("shutdown");
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
