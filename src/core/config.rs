use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Disk,
    Memory,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            simulated_delay_ms: default_simulated_delay_ms(),
        }
    }
}

impl AuthConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

fn default_simulated_delay_ms() -> u64 {
    2000
}

fn default_placeholder_slots() -> usize {
    3
}

fn default_country() -> String {
    "US".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_placeholder_slots")]
    pub placeholder_slots: usize,
    #[serde(default = "default_country")]
    pub default_country: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub data_path: Option<String>,
    pub export_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            placeholder_slots: default_placeholder_slots(),
            default_country: default_country(),
            storage: StorageConfig::default(),
            auth: AuthConfig::default(),
            data_path: None,
            export_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn export_path(&self) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => std::env::current_dir().context("Could not determine current directory"),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "tickerboard", "tickerboard")
            .context("Could not determine project directories")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
placeholder_slots: 4
default_country: "IN"
storage:
  backend: memory
auth:
  simulated_delay_ms: 10
data_path: "/tmp/tickerboard"
export_dir: "/tmp/exports"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.placeholder_slots, 4);
        assert_eq!(config.default_country, "IN");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.simulated_delay(), Duration::from_millis(10));
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/tickerboard")
        );
        assert_eq!(config.export_path().unwrap(), PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config: AppConfig = serde_yaml::from_str("data_path: ~\n").unwrap();
        assert_eq!(config.placeholder_slots, 3);
        assert_eq!(config.default_country, "US");
        assert_eq!(config.storage.backend, StorageBackend::Disk);
        assert_eq!(config.auth.simulated_delay_ms, 2000);
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("nope.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
