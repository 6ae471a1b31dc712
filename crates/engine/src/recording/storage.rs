use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

pub const SESSION_FILE_PREFIX: &str = "session_";
pub const SESSION_FILE_EXTENSION: &str = "jsonl";
const LISTED_EXTENSIONS: [&str; 2] = ["jsonl", "json"];

/// Append-only line sink over a buffered file handle.
#[derive(Debug)]
pub struct LogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LogWriter {
    /// Opens `path` for append, creating missing parent directories.
    pub fn open_append(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    BufReader::new(file).lines().collect()
}

/// File name for a session started at `now`: `session_<unix-millis>.jsonl`.
pub fn session_file_name(now: SystemTime) -> String {
    format!(
        "{SESSION_FILE_PREFIX}{}.{SESSION_FILE_EXTENSION}",
        unix_millis(now)
    )
}

/// First session path under `dir` at or after `now` that does not exist yet.
pub fn unique_session_path(dir: &Path, now: SystemTime) -> PathBuf {
    let mut millis = unix_millis(now);
    loop {
        let candidate = dir.join(format!(
            "{SESSION_FILE_PREFIX}{millis}.{SESSION_FILE_EXTENSION}"
        ));
        if !candidate.exists() {
            return candidate;
        }
        millis = millis.saturating_add(1);
    }
}

fn unix_millis(now: SystemTime) -> u128 {
    now.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingEntry {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl RecordingEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Log files in `dir`, newest modification first. A missing directory lists as empty.
pub fn list_recordings(dir: &Path) -> Vec<RecordingEntry> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(error) => {
            warn!(dir = %dir.display(), error = %error, "recordings_list_failed");
            return Vec::new();
        }
    };

    let mut entries: Vec<RecordingEntry> = read_dir
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_listed_extension(path))
        .map(|path| {
            let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();
            RecordingEntry { path, modified }
        })
        .collect();
    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));
    entries
}

fn has_listed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            LISTED_EXTENSIONS
                .iter()
                .any(|listed| extension.eq_ignore_ascii_case(listed))
        })
}

/// Deletes a log file. Returns `false` when there was nothing to delete.
pub fn delete_recording(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}
