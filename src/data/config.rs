//! Optional `persistence.ron` override for `PersistenceConfig`.
//!
//! Any field left out of the file keeps its default.

use bevy::prelude::*;
use crate::shared::*;

pub const CONFIG_FILE_NAME: &str = "persistence.ron";

pub fn parse_config(text: &str) -> Result<PersistenceConfig, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Read `persistence.ron` next to the executable. Missing or malformed files
/// fall back to the defaults.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config() -> PersistenceConfig {
    let path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| std::path::PathBuf::from(CONFIG_FILE_NAME));
    let Ok(text) = std::fs::read_to_string(&path) else {
        return PersistenceConfig::default();
    };
    match parse_config(&text) {
        Ok(config) => {
            info!("Loaded persistence config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            PersistenceConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_config() -> PersistenceConfig {
    PersistenceConfig::default()
}
