//! String key-value persistence.
//!
//! The snapshot and the pending spawn point are the only keys the game uses.
//! Three backends share the `KeyValueStore` trait: an in-memory map (tests and
//! fallback), one JSON file per key on native targets, and the browser's
//! `localStorage` on wasm.

use bevy::prelude::*;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use super::error::SaveError;

/// Key holding the encoded snapshot.
pub const SNAPSHOT_KEY: &str = "SavedGameState";
/// Key holding the spawn point the next scene should place the player at.
pub const SPAWN_POINT_KEY: &str = "SpawnPoint";

pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn delete(&mut self, key: &str) -> Result<(), SaveError>;

    fn has(&self, key: &str) -> Result<bool, SaveError> {
        Ok(self.get(key)?.is_some())
    }

    /// Make every previous `set` durable.
    fn flush(&mut self) -> Result<(), SaveError> {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// IN-MEMORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), SaveError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILE-BACKED (native)
// ═══════════════════════════════════════════════════════════════════════

/// One `<key>.json` file per key. Writes go to a temp file that is renamed
/// over the target so a crash never leaves a half-written value.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn ensure_dir(&self) -> Result<(), SaveError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.ensure_dir()?;
        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), SaveError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// `<exe dir>/<dir_name>`, falling back to the working directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn saves_directory(dir_name: &str) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join(dir_name)
}

// ═══════════════════════════════════════════════════════════════════════
// BROWSER (wasm32)
// ═══════════════════════════════════════════════════════════════════════

/// `window.localStorage`, looked up per call since JS handles are not `Send`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .ok_or_else(|| SaveError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SaveError::Storage("localStorage unavailable".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, SaveError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn delete(&mut self, key: &str) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCE
// ═══════════════════════════════════════════════════════════════════════

/// The store the save systems read and write through.
#[derive(Resource)]
pub struct SaveStore(Box<dyn KeyValueStore>);

impl SaveStore {
    pub fn new(store: impl KeyValueStore) -> Self {
        Self(Box::new(store))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// The platform default: browser storage on wasm, the saves directory
    /// next to the executable otherwise.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform_default(dir_name: &str) -> Self {
        Self::new(FileStore::new(saves_directory(dir_name)))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn platform_default(_dir_name: &str) -> Self {
        Self::new(LocalStorageStore)
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::ops::Deref for SaveStore {
    type Target = dyn KeyValueStore;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for SaveStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
