use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "CATALOG_BROWSER_CONFIG";
/// Env var overriding `service.base_url`.
pub const BASE_URL_ENV: &str = "CATALOG_BROWSER_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOG_FILTER: &str = "info,catalog_browser=debug";

/// Where and how to reach the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration, read from TOML.
///
/// Every field has a default, so a missing file is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub preferences_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_filter: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "catalog-browser")
}

impl Config {
    /// Load from `$CATALOG_BROWSER_CONFIG` or the platform config dir, then
    /// apply env overrides.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| project_dirs().map(|dirs| dirs.config_dir().join("config.toml")));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Ok(url) = env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.service.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "reading config");
                Self::from_toml_str(&content)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CatalogError::Config {
                details: format!("{}: {e}", path.display()),
            }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CatalogError::Config {
            details: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let url = &self.service.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CatalogError::Config {
                details: format!("service.base_url must be an http(s) URL, got {url:?}"),
            });
        }
        if self.service.timeout_secs == 0 {
            return Err(CatalogError::Config {
                details: "service.timeout_secs must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Preferences file, or `None` if no location can be resolved.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_file.clone().or_else(|| {
            project_dirs().map(|dirs| dirs.config_dir().join("preferences.json"))
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_local_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from(".").join(".catalog-browser").join("logs"))
        })
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service.timeout(), Duration::from_secs(15));
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            preferences_file = "/tmp/prefs.json"

            [service]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8080");
        assert_eq!(config.service.timeout_secs, 15);
        assert_eq!(config.preferences_path(), Some(PathBuf::from("/tmp/prefs.json")));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = Config::from_toml_str("[service\nbase_url = 1").unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.service.base_url = "ftp://example.test".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.service.timeout_secs = 0;
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_filter = \"warn\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_filter(), "warn");
    }
}
