use std::{fs, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::playback::DEFAULT_SPEED_MULTIPLIER;
use crate::track::DEFAULT_LAYER_PREFIX;

/// Settings of the replay core, stored as JSON. Every field is optional in
/// the file and falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub playback: PlaybackSettings,
    pub tracks: TrackSettings,
    pub warnings: WarningSettings,
    pub icons: IconSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Simulated milliseconds advanced per real millisecond.
    pub default_speed_multiplier: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_speed_multiplier: DEFAULT_SPEED_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Prefix of the map layer id of each track.
    pub layer_prefix: String,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            layer_prefix: DEFAULT_LAYER_PREFIX.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningSettings {
    /// How long a user-facing warning stays visible.
    pub lifetime_ms: u64,
}

impl Default for WarningSettings {
    fn default() -> Self {
        Self { lifetime_ms: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    pub default_color: String,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            default_color: "#00f".to_owned(),
        }
    }
}

impl ReplayConfig {
    /// A missing file is not an error, it just means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config: ReplayConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let speed = self.playback.default_speed_multiplier;
        if !speed.is_finite() || speed <= 0. {
            bail!("playback.default_speed_multiplier must be positive, got {speed}");
        }
        Ok(())
    }
}
