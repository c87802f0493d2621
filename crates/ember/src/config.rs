//! Engine configuration.
//!
//! Every key is optional; a missing config file section falls back to the
//! defaults below.
//!
//! ```json
//! {
//!   "window": { "width": 1280, "height": 720, "title": "Your Ember Game!" },
//!   "schema_dir": "assets/components",
//!   "entity_dir": "assets/entities",
//!   "tick_rate": 60.0,
//!   "core_components": true
//! }
//! ```
//!
//! Relative directories in a config loaded with [`Config::load`] are resolved
//! against the config file's own directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::loader::read_json;

const DEFAULT_TICK_RATE: f32 = 60.0;

/// Settings handed to the window collaborator. The ECS core only carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Your Ember Game!".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Directory of component schema files, loaded at startup.
    pub schema_dir: Option<PathBuf>,
    /// Directory of entity definition files, loaded after the schemas.
    pub entity_dir: Option<PathBuf>,
    /// Ticks per second.
    pub tick_rate: f32,
    /// Register the built-in component types.
    pub core_components: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            schema_dir: None,
            entity_dir: None,
            tick_rate: DEFAULT_TICK_RATE,
            core_components: true,
        }
    }
}

impl Config {
    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let mut config: Config = read_json(path)?;
        if let Some(base) = path.parent() {
            config.schema_dir = config.schema_dir.map(|dir| base.join(dir));
            config.entity_dir = config.entity_dir.map(|dir| base.join(dir));
        }
        log::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Time between ticks. A non-positive or non-finite tick rate falls back
    /// to 60 per second.
    pub fn tick_interval(&self) -> Duration {
        let rate = if self.tick_rate.is_finite() && self.tick_rate > 0.0 {
            self.tick_rate
        } else {
            log::warn!("Invalid tick_rate {}; using {DEFAULT_TICK_RATE}", self.tick_rate);
            DEFAULT_TICK_RATE
        };
        Duration::from_secs_f32(1.0 / rate)
    }
}
