//! Local key-value store holding the emulator's mock revoked-serial list.
//! Read-only from the evaluator's perspective.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::pki::normalize_serial;

/// Well-known key for the comma-delimited mock revoked-serial list.
pub const MOCK_REVOKED_SERIALS_KEY: &str = "certificate_revocation_mock_revoked_serials";

pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Directory-backed store: each key is a file under the root.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(key)).ok()
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Read and normalize the mock revoked-serial list. A missing key yields
/// an empty list, never an error.
pub fn read_mock_revoked_serials(store: &dyn LocalStore) -> Vec<String> {
    store
        .get(MOCK_REVOKED_SERIALS_KEY)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(normalize_serial)
                .collect()
        })
        .unwrap_or_default()
}
