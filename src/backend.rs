// Persistence backends for the single task slot

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Default slot name, matching the key older data was stored under
pub const DEFAULT_SLOT: &str = "storedTasksData";

/// One opaque storage slot holding the whole serialized collection
pub trait Backend {
    /// Read the slot. `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Overwrite the slot with `bytes`
    fn save(&mut self, bytes: &[u8]) -> Result<()>;
}

/// In-memory slot, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Option<Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-filled slot
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Some(bytes.into()),
        }
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<()> {
        self.contents = Some(bytes.to_vec());
        Ok(())
    }
}

/// File-backed slot: `{dir}/{slot}.json`
///
/// Holds an exclusive lock on `{dir}/{slot}.lock` until dropped, so only one
/// process at a time reads, mutates, and rewrites the slot.
pub struct FileBackend {
    dir: PathBuf,
    path: PathBuf,
    _lock: File,
}

impl FileBackend {
    /// Open (creating the directory if needed) and lock the slot.
    ///
    /// Fails without waiting when another holder already has the slot open.
    pub fn open<P: AsRef<Path>>(dir: P, slot: &str) -> Result<Self> {
        validate_slot_name(slot)?;

        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create store directory")?;

        let lock_path = dir.join(format!("{}.lock", slot));
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .context("Failed to open slot lock file")?;
        match lock.try_lock_exclusive() {
            Ok(()) => {}
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                return Err(eyre!("Task slot {} is in use by another process", slot));
            }
            Err(e) => return Err(e).context("Failed to acquire slot lock"),
        }

        let path = dir.join(format!("{}.json", slot));
        info!(path = ?path, "Opened task slot");

        Ok(Self { dir, path, _lock: lock })
    }

    /// Path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?self.path, "Slot file does not exist yet");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to read slot file"),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<()> {
        // Write beside the slot and rename over it so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(&self.dir).context("Failed to create temporary slot file")?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).context("Failed to replace slot file")?;

        debug!(path = ?self.path, bytes = bytes.len(), "Flushed slot");
        Ok(())
    }
}

fn validate_slot_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(eyre!("Slot name cannot be empty"));
    }
    if name.len() > 64 {
        return Err(eyre!("Slot name too long: {} (max 64 chars)", name));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!(
            "Invalid slot name: {} (must be alphanumeric with _ or -)",
            name
        ));
    }
    Ok(())
}
