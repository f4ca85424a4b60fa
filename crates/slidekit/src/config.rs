use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::theme::ThemePreference;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidekit";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mode: Option<String>,

    /// Autoplay interval in seconds; absent or 0 keeps autoplay off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
}

/// Where a presentation opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    #[default]
    First,
    /// The slide saved under `presentation-progress`.
    Resume,
    Slide(usize),
}

impl FromStr for StartMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Self::First),
            "resume" => Ok(Self::Resume),
            n => match n.parse::<usize>() {
                Ok(num) if num >= 1 => Ok(Self::Slide(num)),
                _ => anyhow::bail!(
                    "Invalid start_mode: {s}. Must be 'first', 'resume', or a slide number."
                ),
            },
        }
    }
}

impl fmt::Display for StartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Resume => f.write_str("resume"),
            Self::Slide(n) => write!(f, "{n}"),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidekit config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidekit configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                value.parse::<ThemePreference>()?;
                defaults.theme = Some(value.to_string());
            }
            "defaults.start_mode" => {
                value.parse::<StartMode>()?;
                defaults.start_mode = Some(value.to_string());
            }
            "defaults.autoplay" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    anyhow::anyhow!("Invalid autoplay: {value}. Must be a number of seconds.")
                })?;
                defaults.autoplay = Some(secs);
            }
            "defaults.reduced_motion" => {
                let on = value.parse::<bool>().map_err(|_| {
                    anyhow::anyhow!("Invalid reduced_motion: {value}. Must be 'true' or 'false'.")
                })?;
                defaults.reduced_motion = Some(on);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.start_mode, defaults.autoplay, defaults.reduced_motion"
            ),
        }
        Ok(())
    }

    /// Configured theme, ignoring an unparseable value.
    pub fn theme(&self) -> Option<ThemePreference> {
        let raw = self.defaults.as_ref()?.theme.as_deref()?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!("{e}");
                None
            }
        }
    }

    pub fn start_mode(&self) -> StartMode {
        let Some(raw) = self.defaults.as_ref().and_then(|d| d.start_mode.as_deref()) else {
            return StartMode::default();
        };
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!("{e}");
            StartMode::default()
        })
    }

    pub fn autoplay(&self) -> Option<Duration> {
        self.defaults
            .as_ref()
            .and_then(|d| d.autoplay)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    pub fn reduced_motion(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.reduced_motion)
            .unwrap_or(false)
    }
}
