//! # Key File Store
//!
//! Reads and writes key files on the local filesystem.
//!
//! ## Write Protocol
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ATOMIC KEY FILE WRITE                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. Lock       exclusive OS lock on "<file>.lock"                       │
//! │  2. Write      ".<file>.<uuid>.tmp" in the same directory (0600)        │
//! │  3. Sync       fsync the temp file                                      │
//! │  4. Rename     temp file over "<file>"                                  │
//! │  5. Sync dir   fsync the directory entry (Unix)                         │
//! │  6. Unlock     lock released on drop                                    │
//! │                                                                         │
//! │  A reader sees either the old file or the new one, never a mix.        │
//! │  Readers take no lock.                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::{EncryptedKeyContainer, SealedKeyPair};
use crate::error::{Error, Result};
use crate::storage::codec;

/// Write an AES-key container to `path`, replacing any existing file
pub fn write_container(path: &Path, container: &EncryptedKeyContainer) -> Result<()> {
    let bytes = codec::encode_container(container)?;
    write_atomic(path, &bytes)
}

/// Read an AES-key container from `path`
pub fn read_container(path: &Path) -> Result<EncryptedKeyContainer> {
    let bytes = read_file(path)?;
    codec::decode_container(&bytes)
}

/// Replace the container at `path` with `update(current)`
///
/// The write lock is held from the read through the rename, so concurrent
/// updates apply one after another and each sees the previous result. If
/// `update` fails the file is left untouched. Returns the container written.
pub fn update_container<F>(path: &Path, update: F) -> Result<EncryptedKeyContainer>
where
    F: FnOnce(EncryptedKeyContainer) -> Result<EncryptedKeyContainer>,
{
    let _lock = FileLock::acquire(path)?;

    let current = read_container(path)?;
    let updated = update(current)?;
    let bytes = codec::encode_container(&updated)?;
    replace_locked(path, &bytes)?;

    Ok(updated)
}

/// Write a sealed key pair to `path`, replacing any existing file
pub fn write_key_pair(path: &Path, sealed: &SealedKeyPair) -> Result<()> {
    let bytes = codec::encode_key_pair(sealed)?;
    write_atomic(path, &bytes)
}

/// Read a sealed key pair from `path`
pub fn read_key_pair(path: &Path) -> Result<SealedKeyPair> {
    let bytes = read_file(path)?;
    codec::decode_key_pair(&bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        tracing::debug!(error = %e, path = %path.display(), "Failed to read key file");
        Error::Io(format!("{}: {}", path.display(), e))
    })
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    fs::create_dir_all(parent_dir(path))?;

    let _lock = FileLock::acquire(path)?;
    replace_locked(path, data)
}

/// Temp file, fsync, rename. The caller holds the write lock.
fn replace_locked(path: &Path, data: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    let tmp_path = tmp_path_for(path)?;
    let result = write_synced(&tmp_path, data).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))
    });

    if let Err(e) = &result {
        tracing::error!(error = %e, path = %tmp_path.display(), "Failed to write key file");
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            if cleanup.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    error = %cleanup,
                    path = %tmp_path.display(),
                    "Failed to remove temp key file"
                );
            }
        }
        return result;
    }

    sync_dir(dir);
    tracing::info!(path = %path.display(), bytes = data.len(), "Wrote key file");
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        tracing::warn!(error = %e, dir = %dir.display(), "Failed to sync key directory");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Io(format!("{}: not a file path", path.display())))
}

fn tmp_path_for(path: &Path) -> Result<PathBuf> {
    let name = file_name(path)?;
    let unique = uuid::Uuid::new_v4().simple();
    Ok(parent_dir(path).join(format!(".{}.{}.tmp", name, unique)))
}

fn lock_path_for(path: &Path) -> Result<PathBuf> {
    let name = file_name(path)?;
    Ok(parent_dir(path).join(format!("{}.lock", name)))
}

/// Exclusive lock on a key file's sidecar lock file
///
/// Released when dropped. The sidecar is left in place; removing it would
/// let two writers lock different inodes.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = lock_path_for(path)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

// ============================================================================
// TESTS
// ============================================================================
