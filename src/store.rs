//! Key-value persistence for the shot and staff collections.
//!
//! Each collection lives under its own key as a JSON array. Reads never fail:
//! a missing or unparsable value falls back to the seed collection, and the
//! fallback is only persisted by the next explicit write.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{ShotRecord, StaffAccount};
use crate::seed::{seed_shots, seed_staff};

pub const SHOTS_KEY: &str = "EDEN_SHOTS_DB_V1";
pub const STAFF_KEY: &str = "EDEN_STAFF_DB_V1";

pub trait KeyValueBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// True when a value is stored under `key`, readable or not.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// One `<key>.json` document per key inside `root`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read store value");
                None
            }
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create data directory {}", self.root.display()))?;

        let path = self.path_for(key);
        let staging = self.root.join(format!(".{key}.json.tmp"));
        fs::write(&staging, format!("{value}\n"))
            .with_context(|| format!("failed to write {}", staging.display()))?;
        fs::rename(&staging, &path).with_context(|| {
            format!(
                "failed to move {} into place at {}",
                staging.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug)]
pub struct Store<B> {
    backend: B,
}

impl<B: KeyValueBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Seeds each collection whose key has no value yet.
    pub fn initialize(&self) -> Result<()> {
        if !self.backend.contains(SHOTS_KEY) {
            debug!(key = SHOTS_KEY, "seeding shot collection");
            self.write_shots(&seed_shots())?;
        }
        if !self.backend.contains(STAFF_KEY) {
            debug!(key = STAFF_KEY, "seeding staff collection");
            self.write_staff(&seed_staff())?;
        }
        Ok(())
    }

    pub fn read_shots(&self) -> Vec<ShotRecord> {
        self.read_or_seed(SHOTS_KEY, seed_shots)
    }

    pub fn read_staff(&self) -> Vec<StaffAccount> {
        self.read_or_seed(STAFF_KEY, seed_staff)
    }

    pub fn write_shots(&self, shots: &[ShotRecord]) -> Result<()> {
        self.write_collection(SHOTS_KEY, shots)
    }

    pub fn write_staff(&self, staff: &[StaffAccount]) -> Result<()> {
        self.write_collection(STAFF_KEY, staff)
    }

    fn read_or_seed<T, F>(&self, key: &str, seed: F) -> Vec<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        let Some(raw) = self.backend.get(key) else {
            return seed();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(error) => {
                warn!(key, %error, "stored collection is corrupt; using seed data");
                seed()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)
            .with_context(|| format!("failed to serialize collection '{key}'"))?;
        self.backend
            .set(key, &json)
            .with_context(|| format!("failed to persist collection '{key}'"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{FileBackend, KeyValueBackend, MemoryBackend, Store, SHOTS_KEY, STAFF_KEY};
    use crate::model::{ShotCategory, ShotRecord, StaffAccount};
    use crate::seed::{seed_shots, seed_staff};
    use tempfile::tempdir;

    #[test]
    fn initialize_seeds_once() {
        let store = Store::new(MemoryBackend::new());
        store.initialize().expect("initialize should succeed");
        assert_eq!(store.read_shots().len(), 15);

        store
            .write_staff(&[
                StaffAccount::new("bestteameden", "1234"),
                StaffAccount::new("kim", "pw"),
            ])
            .expect("staff should write");
        store.initialize().expect("second initialize should succeed");
        assert_eq!(store.read_staff().len(), 2, "initialize must not overwrite");
    }

    #[test]
    fn absent_and_corrupt_values_fall_back_to_seed() {
        let store = Store::new(MemoryBackend::new());
        assert_eq!(store.read_shots(), seed_shots());
        assert_eq!(store.read_staff(), seed_staff());

        store
            .backend()
            .set(SHOTS_KEY, "{not json")
            .expect("raw write should succeed");
        store
            .backend()
            .set(STAFF_KEY, "[{\"id\": 3}]")
            .expect("raw write should succeed");
        assert_eq!(store.read_shots(), seed_shots());
        assert_eq!(store.read_staff(), seed_staff());
        assert_eq!(
            store.backend().get(SHOTS_KEY).as_deref(),
            Some("{not json"),
            "fallback is not persisted on read"
        );
    }

    #[test]
    fn file_backend_round_trips_collections() {
        let dir = tempdir().expect("tempdir should create");
        let store = Store::new(FileBackend::new(dir.path().join("data")));
        let shots = vec![ShotRecord {
            id: "a1".to_owned(),
            category: ShotCategory::Bridge,
            name: "연결 컷".to_owned(),
            action: "패닝".to_owned(),
            description: "다음 장면으로 자연스럽게 넘어가는 패닝.".to_owned(),
            link: "https://example.com/bridge".to_owned(),
        }];

        store.write_shots(&shots).expect("shots should write");
        assert_eq!(store.read_shots(), shots);
        assert!(dir.path().join("data/EDEN_SHOTS_DB_V1.json").exists());
        assert!(!dir.path().join("data/.EDEN_SHOTS_DB_V1.json.tmp").exists());
    }

    #[test]
    fn initialize_keeps_unreadable_files() {
        let dir = tempdir().expect("tempdir should create");
        let backend = FileBackend::new(dir.path());
        let shots_path = backend.path_for(SHOTS_KEY);
        let garbage = [0xff_u8, 0xfe, b'[', 0x80];
        fs::write(&shots_path, garbage).expect("non-utf8 file should write");

        let store = Store::new(backend);
        store.initialize().expect("initialize should succeed");
        assert_eq!(store.read_shots().len(), 15);
        assert_eq!(
            fs::read(&shots_path).expect("file should remain"),
            garbage.to_vec()
        );
        assert!(store.backend().contains(STAFF_KEY), "absent staff key is seeded");
    }
}
