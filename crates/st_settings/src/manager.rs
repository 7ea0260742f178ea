use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Settings;

/// Cached settings bound to one file.
pub struct ConfigManager {
    path: PathBuf,
    settings: Arc<RwLock<Settings>>,
}

impl ConfigManager {
    /// Load settings from the default location.
    pub fn new() -> Self {
        Self::with_path(Settings::default_path())
    }

    /// Load settings from `path` once and cache them.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Settings::load_from(&path);
        Self {
            path,
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot copy of current settings.
    pub fn get(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn get_shared(&self) -> Arc<RwLock<Settings>> {
        Arc::clone(&self.settings)
    }

    /// Apply `change` to the cached settings and persist the result.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> anyhow::Result<()> {
        let snapshot = {
            let mut guard = self.settings.write();
            change(&mut guard);
            guard.clone()
        };
        snapshot.save_to(&self.path)
    }

    pub fn reload(&self) {
        let new_settings = Settings::load_from(&self.path);
        *self.settings.write() = new_settings;
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
