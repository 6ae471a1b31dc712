//! Session logs of the live world: one JSON record per line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod format;
mod service;
mod storage;

pub use format::{
    keyframe_record, EntityRecord, LogRecord, LOG_FORMAT_VERSION, RECORD_TYPE_HEADER,
    RECORD_TYPE_KEYFRAME,
};
pub use service::{RecordingConfig, RecordingService};
pub use storage::{
    delete_recording, list_recordings, read_lines, session_file_name, unique_session_path,
    LogWriter, RecordingEntry, SESSION_FILE_EXTENSION, SESSION_FILE_PREFIX,
};

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("failed to open recording {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write recording {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode recording record: {0}")]
    Encode(#[source] serde_json::Error),
}
