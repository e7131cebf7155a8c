//! File-backed queue store.
//!
//! Persists the queue as a JSON document, written atomically via a temp
//! file and rename so a crash mid-write leaves the previous document
//! intact. The device id lives in a sibling file, created on first access.

use crate::ports::outbound::QueueStore;
use pay_types::{QueueError, QueuedTransaction, DEVICE_ID_KEY, OFFLINE_TRANSACTIONS_KEY};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

fn io_err(e: impl std::fmt::Display) -> QueueError {
    QueueError::PersistenceFailed {
        reason: e.to_string(),
    }
}

/// Durable store rooted at a directory.
pub struct FileQueueStore {
    queue_path: PathBuf,
    device_path: PathBuf,
    /// Serializes writers; reads are lock-free.
    write_lock: Mutex<()>,
}

impl FileQueueStore {
    /// Creates a store under `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// `PersistenceFailed` if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, QueueError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let queue_path = dir.join(format!("{OFFLINE_TRANSACTIONS_KEY}.json"));
        if let Ok(metadata) = std::fs::metadata(&queue_path) {
            info!(
                path = %queue_path.display(),
                bytes = metadata.len(),
                "Found existing queue document"
            );
        }

        Ok(Self {
            queue_path,
            device_path: dir.join(DEVICE_ID_KEY),
            write_lock: Mutex::new(()),
        })
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), QueueError> {
        let _guard = self.write_lock.lock().map_err(io_err)?;

        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        std::fs::rename(&temp_path, path).map_err(io_err)?;
        Ok(())
    }
}

impl QueueStore for FileQueueStore {
    fn load(&self) -> Result<Vec<QueuedTransaction>, QueueError> {
        let records = match std::fs::read(&self.queue_path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(io_err)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(io_err(e)),
        };
        Ok(super::recover_pending(records))
    }

    fn save_all(&self, queue: &[QueuedTransaction]) -> Result<(), QueueError> {
        let bytes = serde_json::to_vec(queue).map_err(io_err)?;
        self.write_atomic(&self.queue_path, &bytes)
    }

    fn device_id(&self) -> Result<Uuid, QueueError> {
        match std::fs::read_to_string(&self.device_path) {
            Ok(text) => Uuid::parse_str(text.trim()).map_err(io_err),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let id = Uuid::new_v4();
                self.write_atomic(&self.device_path, id.to_string().as_bytes())?;
                info!(device_id = %id, "Created device id");
                Ok(id)
            }
            Err(e) => Err(io_err(e)),
        }
    }
}
