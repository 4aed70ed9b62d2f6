//! Rolling Logger
//!
//! Installs a global `tracing` subscriber that writes to stderr and,
//! optionally, to a size-capped ring of files:
//! `<name>.log` is current, `<name>.1.log` the previous one, and so on up to
//! `max_files`, after which the oldest is dropped.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::{self as fmt_layer, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Rotate once the current file would exceed this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;
/// Files kept in the ring, including the current one
pub const DEFAULT_MAX_FILES: usize = 3;

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),
    #[error("global logger already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Log to stderr and to a rolling file ring under `log_dir`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    let file_stem = app_name.to_lowercase();
    let writer = RollingFileWriter::new(
        log_dir.as_ref(),
        &file_stem,
        DEFAULT_MAX_BYTES,
        DEFAULT_MAX_FILES,
    )?;
    let current = writer.current_path();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt_layer::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_writer(io::stderr),
        )
        .with(
            fmt_layer::layer()
                .with_ansi(false)
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_writer(writer),
        )
        .try_init()?;

    tracing::info!(
        app = app_name,
        file = %current.display(),
        started_at = %chrono::Local::now().to_rfc3339(),
        "logging initialized"
    );
    Ok(())
}

/// Log to stderr only
pub fn init_stderr_logger(app_name: &str) -> Result<(), LoggerError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt_layer::layer()
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_writer(io::stderr),
        )
        .try_init()?;

    tracing::info!(
        app = app_name,
        started_at = %chrono::Local::now().to_rfc3339(),
        "logging initialized"
    );
    Ok(())
}

/// `RUST_LOG` wins; `info` otherwise
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Size-capped ring of log files
pub struct RollingFileWriter {
    state: Mutex<RollingState>,
}

struct RollingState {
    dir: PathBuf,
    stem: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFileWriter {
    pub fn new(dir: &Path, stem: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = ring_path(dir, stem, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            state: Mutex::new(RollingState {
                dir: dir.to_path_buf(),
                stem: stem.to_string(),
                max_bytes: max_bytes.max(1),
                max_files: max_files.max(1),
                file,
                written,
            }),
        })
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        let state = self.lock();
        ring_path(&state.dir, &state.stem, 0)
    }

    fn lock(&self) -> MutexGuard<'_, RollingState> {
        // A panic mid-write leaves the file usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn ring_path(dir: &Path, stem: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", stem))
    } else {
        dir.join(format!("{}.{}.log", stem, index))
    }
}

impl RollingState {
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = ring_path(&self.dir, &self.stem, self.max_files - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (0..self.max_files - 1).rev() {
            let from = ring_path(&self.dir, &self.stem, index);
            if from.exists() {
                fs::rename(&from, ring_path(&self.dir, &self.stem, index + 1))?;
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(ring_path(&self.dir, &self.stem, 0))?;
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.written > 0 && self.written + incoming > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += incoming;
        Ok(buf.len())
    }
}

/// Per-event handle returned by [`RollingFileWriter::make_writer`]
pub struct RollingHandle<'a> {
    writer: &'a RollingFileWriter,
}

impl Write for RollingHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.lock().file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle { writer: self }
    }
}
