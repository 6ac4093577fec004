use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use validator::Validate;

use crate::domain::error::Result;
use crate::domain::table::IngestConfig;

pub const DEFAULT_CONFIG_FILE: &str = "tabview.toml";
pub const ENV_PREFIX: &str = "TABVIEW_";

/// Layers defaults, an optional TOML file, and `TABVIEW_*` environment variables
pub struct ConfigService {
    file: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: path.as_ref().to_path_buf(),
        }
    }

    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(IngestConfig::default()))
            .merge(Toml::file(&self.file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the ingest configuration
    pub fn load(&self) -> Result<IngestConfig> {
        // A missing .env is normal
        let _ = dotenvy::dotenv();

        let config: IngestConfig = self.figment().extract()?;
        config.validate()?;
        debug!(file = %self.file.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Load a named table such as `[display]`, falling back to `T::default()`
    /// for any key the file and environment leave unset
    pub fn load_section<T>(&self, key: &str) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let section: T = Figment::from(Serialized::default(key, T::default()))
            .merge(self.figment())
            .extract_inner(key)?;
        Ok(section)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
