//! Configuration loader.
//!
//! This module provides functionality to load configuration from multiple sources.

use super::{
    ConfigError, DEFAULT_CONFIG_FILES, ENV_PREFIX, LEGACY_SEARCH_API_KEY, LEGACY_STORE_API_KEY,
    LEGACY_STORE_URL, Result, models::*, validation,
};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// Configuration loader that handles loading from multiple sources.
///
/// Later sources override earlier ones.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(SerprankConfig::default()));
        Self { figment }
    }

    /// Load the full layered configuration
    ///
    /// Defaults, then `path` (or the first default file found), then `.env`,
    /// then the legacy variables, then `SERPRANK_` variables.
    pub fn load(path: Option<&Path>) -> Result<SerprankConfig> {
        let mut loader = Self::new();
        match path {
            Some(path) => {
                loader.load_file(path)?;
            }
            None => {
                loader.load_default_files();
            }
        }
        loader.load_dotenv().load_legacy_env().load_env().extract()
    }

    /// Load configuration from a file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let figment = std::mem::take(&mut self.figment).merge(Toml::file(path));
                self.figment = figment;
            }
            Some("yaml") | Some("yml") => {
                let figment = std::mem::take(&mut self.figment).merge(Yaml::file(path));
                self.figment = figment;
            }
            Some("json") => {
                let figment = std::mem::take(&mut self.figment).merge(Json::file(path));
                self.figment = figment;
            }
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        }

        Ok(self)
    }

    /// Attempt to load from default configuration file locations.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(file);
            if path.exists() && self.load_file(&path).is_ok() {
                return self;
            }
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("org", "serprank", "serprank") {
            let config_dir = proj_dirs.config_dir();

            for ext in &["toml", "yaml", "yml", "json"] {
                let path = config_dir.join(format!("config.{}", ext));
                if path.exists() && self.load_file(&path).is_ok() {
                    break;
                }
            }
        }

        self
    }

    /// Load a `.env` file from the working directory (or a parent) into the
    /// process environment. Existing variables are not overridden.
    pub fn load_dotenv(&mut self) -> &mut Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to read .env file: {}", e),
        }
        self
    }

    /// Load a specific `.env` file into the process environment.
    pub fn load_dotenv_from<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        dotenvy::from_path(path.as_ref()).map_err(|e| {
            ConfigError::EnvLoadError(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(self)
    }

    /// Load the unprefixed variables older deployments use
    /// (`SERPAPI_KEY`, `ELASTIC_URL`, `ELASTIC_API_KEY`).
    pub fn load_legacy_env(&mut self) -> &mut Self {
        let legacy = Env::raw()
            .only(&[LEGACY_SEARCH_API_KEY, LEGACY_STORE_URL, LEGACY_STORE_API_KEY])
            .map(|key| {
                if key.as_str().eq_ignore_ascii_case(LEGACY_SEARCH_API_KEY) {
                    "search_api.api_key".into()
                } else if key.as_str().eq_ignore_ascii_case(LEGACY_STORE_URL) {
                    "store.url".into()
                } else {
                    "store.api_key".into()
                }
            });
        let figment = std::mem::take(&mut self.figment).merge(legacy);
        self.figment = figment;
        self
    }

    /// Load configuration from `SERPRANK_` environment variables.
    ///
    /// Nested keys use a double underscore: `SERPRANK_STORE__URL`.
    pub fn load_env(&mut self) -> &mut Self {
        let figment = std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Load configuration from a custom source.
    pub fn merge<T: figment::Provider>(&mut self, provider: T) -> &mut Self {
        let figment = std::mem::take(&mut self.figment).merge(provider);
        self.figment = figment;
        self
    }

    /// Extract and validate the configuration.
    pub fn extract(&self) -> Result<SerprankConfig> {
        let config: SerprankConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validation::validate_config(&config)?;

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
