//! Configuration loader/writer plus strongly typed settings structures.
//!
//! A default `config.toml` is embedded in the binary and extracted to the data
//! directory on first run. Every field has a serde default so partial files
//! load cleanly.

use crate::widgets::{Template, COUNTDOWN_FIELDS, NOTICE_FIELDS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MIDNIGHT_DIR";

/// Top-level configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub elements: ElementsConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Target element ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementsConfig {
    #[serde(default = "default_countdown_id")]
    pub countdown_id: String,
    #[serde(default = "default_notice_id")]
    pub notice_id: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            countdown_id: default_countdown_id(),
            notice_id: default_notice_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_countdown_template")]
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_text: Option<String>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            template: default_countdown_template(),
            zero_text: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeConfig {
    #[serde(default = "default_notice_template")]
    pub template: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            template: default_notice_template(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64, // Event poll timeout in milliseconds (lower = higher FPS, higher CPU)
    #[serde(default = "default_show_border")]
    pub show_border: bool,
    #[serde(default = "default_border_style")]
    pub border_style: String, // "plain", "double", "rounded", "thick"
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String, // Used for <strong>/<b> spans in the notice
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            show_border: default_show_border(),
            border_style: default_border_style(),
            text_color: default_text_color(),
            highlight_color: default_highlight_color(),
        }
    }
}

fn default_countdown_id() -> String {
    "countdown".to_string()
}

fn default_notice_id() -> String {
    "newsDescription".to_string()
}

fn default_countdown_template() -> String {
    crate::widgets::countdown::DEFAULT_COUNTDOWN_TEMPLATE.to_string()
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_notice_template() -> String {
    crate::widgets::notice::DEFAULT_NOTICE_TEMPLATE.to_string()
}

fn default_poll_timeout_ms() -> u64 {
    16 // ~60 FPS
}

fn default_show_border() -> bool {
    true
}

fn default_border_style() -> String {
    "rounded".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_highlight_color() -> String {
    "#ffd700".to_string()
}

impl Config {
    /// Load `config.toml` from the data directory, extracting the default first
    pub fn load() -> Result<Self> {
        Self::extract_defaults()?;
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse TOML and apply the same fixups as a file load
    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        for warning in config.normalize() {
            tracing::warn!("Config: {}", warning);
        }
        Ok(config)
    }

    /// The embedded default config
    #[cfg(test)]
    pub fn embedded_default() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG).context("Failed to parse embedded default config")
    }

    /// Fix values that would break the display and report everything suspicious
    pub fn normalize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.countdown.tick_interval_ms == 0 {
            warnings.push(format!(
                "countdown.tick_interval_ms must be positive, using {}",
                default_tick_interval_ms()
            ));
            self.countdown.tick_interval_ms = default_tick_interval_ms();
        }

        if self.elements.countdown_id.is_empty() {
            warnings.push("elements.countdown_id is empty, countdown is disabled".to_string());
        }
        if self.elements.notice_id.is_empty() {
            warnings.push("elements.notice_id is empty, notice is disabled".to_string());
        }
        if !self.elements.countdown_id.is_empty()
            && self.elements.countdown_id == self.elements.notice_id
        {
            warnings.push(format!(
                "countdown and notice share element id '{}', the notice will overwrite the countdown until the next tick",
                self.elements.countdown_id
            ));
        }

        let countdown = Template::parse(&self.countdown.template);
        for field in countdown.unknown_fields(COUNTDOWN_FIELDS) {
            warnings.push(format!("countdown.template has unknown field {{{}}}", field));
        }
        let notice = Template::parse(&self.notice.template);
        for field in notice.unknown_fields(NOTICE_FIELDS) {
            warnings.push(format!("notice.template has unknown field {{{}}}", field));
        }

        warnings
    }

    /// Load `path` (struct defaults if it doesn't exist) and write it back with
    /// every field spelled out and invalid values fixed
    pub fn rewrite(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            Self::load_from_path(path)?
        } else {
            Self::default()
        };
        config.save_to_path(path)?;
        tracing::info!("Rewrote config at {:?}", path);
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context(format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Write the embedded config.toml if none exists yet.
    /// Returns the path and whether a file was written.
    pub fn extract_defaults() -> Result<(PathBuf, bool)> {
        let config_path = Self::config_path()?;
        Self::extract_defaults_to(&config_path).map(|written| (config_path, written))
    }

    fn extract_defaults_to(config_path: &Path) -> Result<bool> {
        if config_path.exists() {
            return Ok(false);
        }
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create data directory {:?}", parent))?;
        }
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
        tracing::info!("Extracted default config to {:?}", config_path);
        Ok(true)
    }

    /// Get the base data directory (~/.midnight/)
    /// Can be overridden with MIDNIGHT_DIR environment variable
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".midnight"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("midnight.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "midnight-config-test-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_embedded_default_matches_struct_default() {
        let embedded = Config::embedded_default().unwrap();
        assert_eq!(embedded, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [countdown]
            template = "{hh}:{mm}:{ss}"
            "#,
        )
        .unwrap();

        assert_eq!(config.countdown.template, "{hh}:{mm}:{ss}");
        assert_eq!(config.countdown.tick_interval_ms, 1000);
        assert_eq!(config.elements.countdown_id, "countdown");
        assert_eq!(config.elements.notice_id, "newsDescription");
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml("[countdown\ntemplate = 1").is_err());
        assert!(Config::from_toml("[countdown]\ntick_interval_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_zero_tick_interval_is_fixed() {
        let mut config = Config::default();
        config.countdown.tick_interval_ms = 0;
        let warnings = config.normalize();
        assert_eq!(config.countdown.tick_interval_ms, 1000);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_fields_warn() {
        let mut config = Config::default();
        config.countdown.template = "{hh} {days}".to_string();
        config.notice.template = "{day} {weekday}".to_string();
        let warnings = config.normalize();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("{days}"));
        assert!(warnings[1].contains("{weekday}"));
    }

    #[test]
    fn test_shared_element_id_warns() {
        let mut config = Config::default();
        config.elements.notice_id = config.elements.countdown_id.clone();
        let warnings = config.normalize();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("share element id"));
    }

    #[test]
    fn test_default_config_is_clean() {
        assert!(Config::default().normalize().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("config.toml");

        let mut config = Config::default();
        config.countdown.zero_text = Some("Closed".to_string());
        config.ui.show_border = false;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rewrite_fills_missing_fields() {
        let dir = scratch_dir("rewrite");
        let path = dir.join("config.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "[countdown]\ntick_interval_ms = 0\n").unwrap();

        let config = Config::rewrite(&path).unwrap();
        assert_eq!(config.countdown.tick_interval_ms, 1000);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("[elements]"));
        assert!(written.contains("[ui]"));
        assert!(written.contains("tick_interval_ms = 1000"));
        assert_eq!(Config::load_from_path(&path).unwrap(), config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rewrite_missing_file_writes_defaults() {
        let dir = scratch_dir("rewrite-missing");
        let path = dir.join("config.toml");

        let config = Config::rewrite(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::load_from_path(&path).unwrap(), Config::default());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_extract_does_not_overwrite() {
        let dir = scratch_dir("extract");
        let path = dir.join("config.toml");

        assert!(Config::extract_defaults_to(&path).unwrap());
        fs::write(&path, "[ui]\nshow_border = false\n").unwrap();
        assert!(!Config::extract_defaults_to(&path).unwrap());

        let loaded = Config::load_from_path(&path).unwrap();
        assert!(!loaded.ui.show_border);

        let _ = fs::remove_dir_all(&dir);
    }
}
