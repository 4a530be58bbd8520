use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PAGE_SIZE, LOAD_MORE_THRESHOLD, SPLIT_RATIO_MAX, SPLIT_RATIO_MIN};
use crate::mail::RenderPreference;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub list: ListConfig,
    /// AI features configuration (OpenRouter)
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub keybinding_mode: KeybindingMode,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Split pane ratio for list/preview (30-70, default 50 = equal split)
    #[serde(default = "default_split_ratio")]
    pub split_ratio: u16,
    /// Body part shown for messages that have no per-message override
    #[serde(default)]
    pub render_preference: RenderPreference,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            keybinding_mode: KeybindingMode::default(),
            date_format: default_date_format(),
            split_ratio: default_split_ratio(),
            render_preference: RenderPreference::default(),
        }
    }
}

impl UiConfig {
    pub fn clamped_split_ratio(&self) -> u16 {
        self.split_ratio.clamp(SPLIT_RATIO_MIN, SPLIT_RATIO_MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingMode {
    #[default]
    Vim,
    Arrows,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Items requested per page from the mailbox
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Fetch the next page when the selection is this close to the end
    #[serde(default = "default_load_more_threshold")]
    pub load_more_threshold: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            load_more_threshold: default_load_more_threshold(),
        }
    }
}

/// AI features configuration (OpenRouter integration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenRouter API key (falls back to OPENROUTER_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub enable_summaries: bool,
    #[serde(default)]
    pub enable_labels: bool,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,
    #[serde(default = "default_labels_max_tokens")]
    pub labels_max_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            enable_summaries: false,
            enable_labels: false,
            model: default_ai_model(),
            summary_max_tokens: default_summary_max_tokens(),
            labels_max_tokens: default_labels_max_tokens(),
        }
    }
}

impl AiConfig {
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Check if any AI features are enabled and configured
    pub fn is_enabled(&self) -> bool {
        (self.enable_summaries || self.enable_labels) && self.api_key().is_some()
    }
}

fn default_ai_model() -> String {
    "anthropic/claude-3-haiku".to_string()
}

fn default_summary_max_tokens() -> u32 {
    300
}

fn default_labels_max_tokens() -> u32 {
    40
}

fn default_date_format() -> String {
    "%b %d".to_string()
}

fn default_split_ratio() -> u16 {
    50
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_load_more_threshold() -> usize {
    LOAD_MORE_THRESHOLD
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("tern");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the default location; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if config.list.page_size == 0 {
            anyhow::bail!("list.page_size must be at least 1");
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}
