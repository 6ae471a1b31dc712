//! Playback of session logs: tolerant parsing, keyframe timeline and
//! reconstruction of a passive entity set.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod keyframe;
mod playback;
mod reconstruct;
pub mod record;
mod scene;

pub use keyframe::{
    load_keyframes, parse_keyframe, parse_keyframes, EntityInfo, Keyframe, DEFAULT_REPLAY_COLOR,
    MISSING_UID,
};
pub use playback::{bracket, interpolation_fraction, FrameSample, Timeline, SPAN_EPSILON};
pub use reconstruct::{build_visual, ReconcileStats, Reconstruction};
pub use scene::{ReplayScene, ReplayState};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read recording {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("replayed entity {uid} is no longer in the world")]
    MissingEntity { uid: i64 },
}
