use std::path::PathBuf;
use std::sync::Arc;

use crate::store::{FileBackend, MemoryBackend, RecordStore};

/// Opens the file-backed store rooted at `data_dir`. Nothing is read until
/// the first operation; call [`crate::migrations::provision`] first.
pub fn connect(data_dir: impl Into<PathBuf>) -> RecordStore {
    RecordStore::new(Arc::new(FileBackend::new(data_dir)))
}

/// Store over a fresh [`MemoryBackend`], returned alongside it for failure injection.
pub fn connect_in_memory() -> (RecordStore, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::default());
    (RecordStore::new(backend.clone()), backend)
}
