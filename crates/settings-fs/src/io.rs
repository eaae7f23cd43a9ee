//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoff;
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result};

/// Tuning for writes that replace settings files on disk.
#[derive(Debug, Clone, Copy)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Whether to fsync the temp file before renaming it into place.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn lock_path_for(native_path: &Path) -> PathBuf {
    let mut lock = native_path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}

/// Open the sidecar at `lock_path` and take an exclusive lock on it.
///
/// A holder unlinks the sidecar before releasing it, so a waiter may end up
/// locking an inode that is no longer reachable from `lock_path`. Such a lock
/// excludes nobody; it is dropped and the sidecar reopened.
fn acquire_lock(lock_path: &Path, native_path: &Path, timeout: Duration) -> Result<fs::File> {
    let policy = ExponentialBackoff {
        current_interval: Duration::from_millis(10),
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(250),
        max_elapsed_time: Some(timeout),
        ..ExponentialBackoff::default()
    };
    let contended = fs2::lock_contended_error().raw_os_error();
    let lock_failed = || Error::LockFailed {
        path: native_path.to_path_buf(),
    };

    backoff::retry(policy, || {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| backoff::Error::permanent(Error::io(lock_path, e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) if is_current_sidecar(&lock_file, lock_path) => Ok(lock_file),
            Ok(()) => {
                tracing::trace!(path = %lock_path.display(), "Locked a stale sidecar, reopening");
                Err(backoff::Error::transient(lock_failed()))
            }
            Err(e) if e.raw_os_error() == contended => {
                Err(backoff::Error::transient(lock_failed()))
            }
            Err(_) => Err(backoff::Error::permanent(lock_failed())),
        }
    })
    .map_err(|e| match e {
        backoff::Error::Permanent(err) => err,
        backoff::Error::Transient { err, .. } => err,
    })
}

/// Whether `lock_path` still names the inode behind `lock_file`.
#[cfg(unix)]
fn is_current_sidecar(lock_file: &fs::File, lock_path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (lock_file.metadata(), fs::metadata(lock_path)) {
        (Ok(held), Ok(linked)) => held.dev() == linked.dev() && held.ino() == linked.ino(),
        _ => false,
    }
}

// The sidecar is never unlinked off unix, so a held lock is always current.
#[cfg(not(unix))]
fn is_current_sidecar(_lock_file: &fs::File, _lock_path: &Path) -> bool {
    true
}

/// Unlink the sidecar while still holding it, then unlock.
fn release_lock(lock_file: fs::File, lock_path: &Path) {
    #[cfg(unix)]
    let _ = fs::remove_file(lock_path);
    #[cfg(not(unix))]
    let _ = lock_path;

    let _ = FileExt::unlock(&lock_file);
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// Writers to the same path are serialized through a `<file>.lock` sidecar,
/// retried with exponential backoff up to `config.lock_timeout`. On unix the
/// sidecar is removed again once the write is done.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();
    if path.is_network_path() {
        tracing::warn!(%path, "Writing to a network path; locking may be unreliable");
    }

    if let Some(parent) = native_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let lock_path = lock_path_for(&native_path);
    let lock_file = match acquire_lock(&lock_path, &native_path, config.lock_timeout) {
        Ok(file) => file,
        Err(e) => {
            if matches!(e, Error::LockFailed { .. }) {
                tracing::warn!(%path, timeout = ?config.lock_timeout, "Timed out waiting for file lock");
            }
            return Err(e);
        }
    };

    let result = replace_contents(&native_path, content, config.enable_fsync);
    release_lock(lock_file, &lock_path);

    if result.is_ok() {
        tracing::debug!(%path, bytes = content.len(), "Wrote file atomically");
    }
    result
}

fn replace_contents(native_path: &Path, content: &[u8], enable_fsync: bool) -> Result<()> {
    // Same directory keeps the rename on one filesystem.
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let written = write_then_rename(&temp_path, native_path, content, enable_fsync);
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_then_rename(
    temp_path: &Path,
    native_path: &Path,
    content: &[u8],
    enable_fsync: bool,
) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    if enable_fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }
    drop(temp_file);

    fs::rename(temp_path, native_path).map_err(|e| Error::io(native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically with default robustness settings.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}

/// Read and deserialize a JSON file.
///
/// A missing file surfaces as [`Error::Io`] with a `NotFound` kind; check it
/// with [`Error::is_not_found`].
pub async fn read_json<T: DeserializeOwned>(path: &NormalizedPath) -> Result<T> {
    let native_path = path.to_native();
    let content = tokio::fs::read_to_string(&native_path)
        .await
        .map_err(|e| Error::io(&native_path, e))?;

    serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
        path: native_path,
        format: "JSON".into(),
        message: e.to_string(),
    })
}

/// Render a value as 2-space indented JSON with a trailing newline.
pub fn to_json_string<T: Serialize>(path: &NormalizedPath, value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
        path: path.to_native(),
        format: "JSON".into(),
        message: e.to_string(),
    })?;
    rendered.push('\n');
    Ok(rendered)
}

/// Serialize a value as 2-space indented JSON and write it atomically,
/// creating parent directories as needed.
pub async fn write_json<T: Serialize>(
    path: &NormalizedPath,
    value: &T,
    config: RobustnessConfig,
) -> Result<()> {
    let rendered = to_json_string(path, value)?;
    let target = path.clone();

    tokio::task::spawn_blocking(move || write_atomic(&target, rendered.as_bytes(), config))
        .await
        .map_err(|e| Error::io(path.to_native(), std::io::Error::other(e)))?
}
