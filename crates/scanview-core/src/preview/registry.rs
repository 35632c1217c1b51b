//! Revocable object references for natively displayable files.
//!
//! Non-TIFF scans are handed to the display layer as-is. The bytes are
//! parked in a reference table and the caller gets back an opaque
//! `blob:`-shaped string. Entries live until the caller releases them;
//! nothing is collected automatically.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::surface::SurfaceError;

/// Prefix of references handed out by [`ObjectUrlRegistry`].
pub const OBJECT_URL_PREFIX: &str = "blob:scanview/";

/// A table of revocable byte references.
///
/// Implementations must hand out a distinct reference on every `create`
/// and keep the bytes reachable until `release` is called with it.
pub trait ReferenceTable {
    /// Register `bytes` under a fresh reference.
    fn create(&self, bytes: &[u8], mime: &str) -> Result<String, SurfaceError>;

    /// Drop a reference. Returns `false` if it was unknown or already released.
    fn release(&self, reference: &str) -> bool;
}

/// Bytes held behind one object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredObject {
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

/// In-process reference table.
///
/// Thread-safe; concurrent callers registering different files never see
/// each other's entries.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<String, RegisteredObject>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the bytes behind a live reference.
    pub fn get(&self, reference: &str) -> Option<RegisteredObject> {
        self.lock().get(reference).cloned()
    }

    /// Number of live references.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Release every live reference, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RegisteredObject>> {
        // The map stays consistent even if a holder panicked
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReferenceTable for ObjectUrlRegistry {
    fn create(&self, bytes: &[u8], mime: &str) -> Result<String, SurfaceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let reference = format!("{}{}", OBJECT_URL_PREFIX, id);

        self.lock().insert(
            reference.clone(),
            RegisteredObject {
                mime: mime.to_string(),
                bytes: Arc::from(bytes),
            },
        );

        log::debug!("Registered {} ({} bytes, {})", reference, bytes.len(), mime);
        Ok(reference)
    }

    fn release(&self, reference: &str) -> bool {
        let removed = self.lock().remove(reference).is_some();
        if !removed {
            log::warn!("Release of unknown object reference {}", reference);
        }
        removed
    }
}
