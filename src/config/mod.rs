use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: Session,

    #[serde(default)]
    pub ui: UiConfig,

    /// File this config was loaded from; `None` means the default location
    #[serde(skip)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_notice_seconds")]
    pub notice_seconds: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_notice_seconds() -> u64 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: Session::default(),
            ui: UiConfig::default(),
            path: None,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_seconds: default_notice_seconds(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.athlete-results/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".athlete-results"))
    }

    /// Get config file path (~/.athlete-results/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default file
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from `path`, or the default file when `None`
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_file = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file()?,
        };

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self {
                path: path.map(Path::to_path_buf),
                ..Self::default()
            });
        }

        let contents = fs::read_to_string(&config_file).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        config.path = path.map(Path::to_path_buf);

        Ok(config)
    }

    /// Same config, saved to `path` from now on
    pub fn at(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// File this config is saved to
    pub fn location(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => Self::config_file(),
        }
    }

    /// Save configuration to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let config_file = self.location()?;
        if let Some(dir) = config_file.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_file, contents).context("Failed to write config file")?;

        tracing::debug!("Saved config to {}", config_file.display());
        Ok(())
    }

    /// Check if a signed-in session is stored
    pub fn is_authenticated(&self) -> bool {
        self.session.is_active()
    }
}
