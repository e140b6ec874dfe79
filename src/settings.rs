use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ui_realm::messages::View;

const DEFAULT_DEFAULT_VIEW: &str = "comments";
const MIN_TICK_INTERVAL_MS: u64 = 100;
const MAX_TICK_INTERVAL_MS: u64 = 5_000;
const DEFAULT_TICK_INTERVAL_MS: u64 = 250;
const MAX_COMMENT_LOAD_DELAY_MS: u64 = 10_000;
const DEFAULT_COMMENT_LOAD_DELAY_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_view: String,
    pub tick_interval_ms: u64,
    /// Simulated latency of the in-memory comment source.
    pub comment_load_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view: DEFAULT_DEFAULT_VIEW.to_string(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            comment_load_delay_ms: DEFAULT_COMMENT_LOAD_DELAY_MS,
            fixtures: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("taskdeck");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.validate();
                    settings
                }
                Err(error) => {
                    warn!(
                        "failed to parse settings config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read settings config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to atomically rename settings file '{}' to '{}'",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    pub fn view(&self) -> View {
        View::from_str(&self.default_view).unwrap_or_default()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn comment_load_delay(&self) -> Duration {
        Duration::from_millis(self.comment_load_delay_ms)
    }

    /// Records the view shown at exit. Returns whether anything changed.
    pub fn remember_view(&mut self, view: View) -> bool {
        let name = view.as_str();
        if self.default_view == name {
            return false;
        }
        self.default_view = name.to_string();
        true
    }

    /// Clamps a command-line latency override to the accepted range.
    pub fn clamp_load_delay(delay_ms: u64) -> Duration {
        Duration::from_millis(delay_ms.min(MAX_COMMENT_LOAD_DELAY_MS))
    }

    fn validate(&mut self) {
        self.tick_interval_ms = self
            .tick_interval_ms
            .clamp(MIN_TICK_INTERVAL_MS, MAX_TICK_INTERVAL_MS);
        self.comment_load_delay_ms = self.comment_load_delay_ms.min(MAX_COMMENT_LOAD_DELAY_MS);

        self.default_view = match View::from_str(&self.default_view) {
            Ok(view) => view.as_str().to_string(),
            Err(()) => {
                warn!(
                    "invalid default_view '{}' in settings config; falling back to {}",
                    self.default_view, DEFAULT_DEFAULT_VIEW
                );
                DEFAULT_DEFAULT_VIEW.to_string()
            }
        };
    }
}
