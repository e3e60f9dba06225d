use std::path::{Path, PathBuf};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::constants::CONFIG_EXPORT_PREFIX;
use crate::core::session::TurbineSession;
use crate::models::configuration::{ConfigError, Configuration};
use crate::utils::logging::{self, OperationCategory, FileIOType};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    configurations: Vec<Configuration>,
}

/// Named configurations persisted together in one JSON file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    configurations: Vec<Configuration>,
}

impl ConfigStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let _timing = logging::start_timing("config_store_open",
            OperationCategory::FileIO { subcategory: FileIOType::ConfigLoad });

        let path = path.as_ref().to_path_buf();
        let configurations = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let store: StoreFile = serde_json::from_str(&content)?;
            for config in &store.configurations {
                config.validate()?;
            }
            store.configurations
        } else {
            Vec::new()
        };

        info!(path = %path.display(), count = configurations.len(), "opened configuration store");
        Ok(Self { path, configurations })
    }

    pub fn list(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn get(&self, id: i64) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().rev().find(|c| c.name == name)
    }

    /// Append a configuration. Memory only changes once the file is written.
    pub fn save(&mut self, config: Configuration) -> Result<(), ConfigError> {
        config.validate()?;
        let mut next = self.configurations.clone();
        next.push(config);
        self.write_file(&next)?;
        self.configurations = next;
        Ok(())
    }

    /// Store the session's current layout under `name`. Unlike [`import`],
    /// an empty layout is refused.
    ///
    /// [`import`]: ConfigStore::import
    pub fn save_layout(&mut self, session: &TurbineSession, name: &str) -> Result<&Configuration, ConfigError> {
        if session.is_empty() {
            return Err(ConfigError::EmptyLayout);
        }
        let mut config = session.to_configuration(name);
        config.id = self.unique_id(config.id);
        self.save(config)?;
        info!(name, turbines = session.len(), "saved layout");
        self.last()
    }

    pub fn delete(&mut self, id: i64) -> Result<Configuration, ConfigError> {
        let pos = self.configurations
            .iter()
            .position(|c| c.id == id)
            .ok_or(ConfigError::NotFound(id))?;
        let mut next = self.configurations.clone();
        let removed = next.remove(pos);
        self.write_file(&next)?;
        self.configurations = next;
        Ok(removed)
    }

    /// Import a single exported configuration. The stored copy gets a fresh id
    /// and timestamp.
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<&Configuration, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let mut config = Configuration::from_json(&json)?;

        let now = Utc::now();
        config.id = self.unique_id(now.timestamp_millis());
        config.timestamp = now;

        self.save(config)?;
        info!(path = %path.as_ref().display(), "imported configuration");
        self.last()
    }

    /// Write one configuration to `dir` as `windturbine-<slug>.json`.
    pub fn export(&self, id: i64, dir: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
        let config = self.get(id).ok_or(ConfigError::NotFound(id))?;
        std::fs::create_dir_all(dir.as_ref())?;
        let path = dir.as_ref().join(format!("{}{}.json", CONFIG_EXPORT_PREFIX, config.slug()));
        std::fs::write(&path, config.to_json_pretty()?)?;
        Ok(path)
    }

    // Millisecond ids can collide on fast saves
    fn unique_id(&self, mut id: i64) -> i64 {
        while self.get(id).is_some() {
            id += 1;
        }
        id
    }

    fn last(&self) -> Result<&Configuration, ConfigError> {
        self.configurations.last().ok_or(ConfigError::NotFound(0))
    }

    fn write_file(&self, configurations: &[Configuration]) -> Result<(), ConfigError> {
        let _timing = logging::start_timing("config_store_flush",
            OperationCategory::FileIO { subcategory: FileIOType::ConfigSave });

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = StoreFile { configurations: configurations.to_vec() };
        std::fs::write(&self.path, serde_json::to_string_pretty(&store)?)?;
        Ok(())
    }
}
