use std::path::{Path, PathBuf};

use tracing::info;

use crate::sim::SceneWorld;

use super::format::{keyframe_record, LogRecord, LOG_FORMAT_VERSION};
use super::storage::LogWriter;
use super::RecordingError;

#[derive(Debug, Clone)]
pub struct RecordingConfig {
    pub path: PathBuf,
    /// Seconds between keyframes; `0.0` writes one every frame.
    pub keyframe_interval: f32,
    /// Flush after this many keyframes; `0` flushes only on stop.
    pub flush_every: u32,
}

/// Writes a session log: one header line, then keyframes of the live world.
#[derive(Debug)]
pub struct RecordingService {
    config: RecordingConfig,
    writer: Option<LogWriter>,
    elapsed: f64,
    since_keyframe: f64,
    keyframes_written: u64,
    unflushed: u32,
}

impl RecordingService {
    pub fn start(config: RecordingConfig, world: &SceneWorld) -> Result<Self, RecordingError> {
        let writer = LogWriter::open_append(&config.path).map_err(|source| {
            RecordingError::Open {
                path: config.path.clone(),
                source,
            }
        })?;
        let mut service = Self {
            config,
            writer: Some(writer),
            elapsed: 0.0,
            since_keyframe: 0.0,
            keyframes_written: 0,
            unflushed: 0,
        };
        let arena = world.arena();
        service.write_record(&LogRecord::Header {
            version: LOG_FORMAT_VERSION,
            w: arena.width.max(0.0) as u32,
            h: arena.height.max(0.0) as u32,
        })?;
        service.write_keyframe(world)?;
        info!(path = %service.config.path.display(), "recording_started");
        Ok(service)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn keyframes_written(&self) -> u64 {
        self.keyframes_written
    }

    pub fn update(&mut self, dt: f32, world: &SceneWorld) -> Result<(), RecordingError> {
        if self.writer.is_none() {
            return Ok(());
        }
        let dt = f64::from(dt.max(0.0));
        self.elapsed += dt;
        self.since_keyframe += dt;
        if self.since_keyframe + f64::EPSILON < f64::from(self.config.keyframe_interval) {
            return Ok(());
        }
        self.since_keyframe = 0.0;
        self.write_keyframe(world)
    }

    /// Flushes and closes the log. Safe to call more than once.
    pub fn stop(&mut self) -> Result<(), RecordingError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer.flush().map_err(|source| RecordingError::Write {
            path: self.config.path.clone(),
            source,
        })?;
        info!(
            path = %self.config.path.display(),
            keyframes = self.keyframes_written,
            duration_s = self.elapsed,
            "recording_stopped"
        );
        Ok(())
    }

    fn write_keyframe(&mut self, world: &SceneWorld) -> Result<(), RecordingError> {
        let record = keyframe_record(self.elapsed, world);
        self.write_record(&record)?;
        self.keyframes_written = self.keyframes_written.saturating_add(1);
        self.unflushed = self.unflushed.saturating_add(1);
        if self.config.flush_every > 0 && self.unflushed >= self.config.flush_every {
            self.unflushed = 0;
            if let Some(writer) = self.writer.as_mut() {
                writer.flush().map_err(|source| RecordingError::Write {
                    path: self.config.path.clone(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> Result<(), RecordingError> {
        let line = serde_json::to_string(record).map_err(RecordingError::Encode)?;
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .write_line(&line)
            .map_err(|source| RecordingError::Write {
                path: self.config.path.clone(),
                source,
            })
    }
}

impl Drop for RecordingService {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            let _ = writer.flush();
        }
    }
}
