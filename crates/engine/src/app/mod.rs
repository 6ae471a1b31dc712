mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputState, Key, MouseButton};
pub use loop_runner::{run_app, AppError, GameLoop, LoopConfig, LoopState};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{
    BackendError, DrawCommand, HeadlessBackend, PixelsBackend, RenderBackend, TEXT_ADVANCE_PX,
};
pub use scene::{RecordingPolicy, Scene, SceneCommand, SceneFactory, SceneKey};
