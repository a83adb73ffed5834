use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{RegistryError, RegistryResult};
use crate::settings::ProcessorSettings;

/// Where processor settings come from.
///
/// Called once per top-level serialization; implementations should not
/// cache if configuration changes are expected to apply per call.
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> RegistryResult<ProcessorSettings>;
}

/// Settings held in memory. [`replace`](Self::replace) takes effect on the
/// next call.
#[derive(Debug, Default)]
pub struct StaticConfig {
    settings: RwLock<ProcessorSettings>,
}

impl StaticConfig {
    pub fn new(settings: ProcessorSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub fn replace(&self, settings: ProcessorSettings) {
        *self.settings.write().expect("lock poisoned") = settings;
    }
}

impl ConfigSource for StaticConfig {
    fn load(&self) -> RegistryResult<ProcessorSettings> {
        Ok(self.settings.read().expect("lock poisoned").clone())
    }
}

/// Settings read from a TOML file on every load.
#[derive(Clone, Debug)]
pub struct TomlFileConfig {
    path: PathBuf,
}

impl TomlFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for TomlFileConfig {
    fn load(&self) -> RegistryResult<ProcessorSettings> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })?;
        ProcessorSettings::from_toml_str(&text)
    }
}
