use anyhow::{bail, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::layout::LayoutOptions;

const APP_NAME: &str = "proposal-deck";
const CONFIG_FILE: &str = "config.json";

pub const PORT_ENV: &str = "PROPOSAL_DECK_PORT";
pub const HOST_ENV: &str = "PROPOSAL_DECK_HOST";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Slide size, pagination and cover branding.
    #[serde(flatten)]
    pub layout: LayoutOptions,
    pub server: ServerConfig,
}

impl DeckConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let mut config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(&config_path)
    }

    /// Load an explicitly named file. Unlike [`DeckConfig::load`], any problem
    /// is an error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = serde_json::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        Ok(config)
    }

    /// Apply `PROPOSAL_DECK_*` overrides. `lookup` resolves a variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup(HOST_ENV).filter(|h| !h.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", PORT_ENV, port),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let slide = &self.layout.slide;
        if !(slide.width > 0.0 && slide.height > 0.0) {
            bail!(
                "slide dimensions must be positive, got {}x{}",
                slide.width,
                slide.height
            );
        }
        if slide.margin < 0.0 || slide.margin * 2.0 >= slide.width.min(slide.height) {
            bail!("slide margin {} does not fit the slide", slide.margin);
        }
        if self.layout.features_per_page == 0 {
            bail!("featuresPerPage must be at least 1");
        }
        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
