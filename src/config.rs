use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

pub const DEFAULT_HEIGHT: u32 = 240;
pub const DEFAULT_WIDTH: u32 = DEFAULT_HEIGHT * 16 / 9;

/// Resolved application configuration.
///
/// Precedence: defaults, then the JSON config file, then command-line
/// flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub ticks_per_second: u32,
    pub scale: u32,
    pub title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ticks_per_second: 60,
            scale: 2,
            title: "pixel-loop".to_string(),
        }
    }
}

impl AppConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the effective configuration from command-line flags and the
    /// optional config file.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(width) = cli.width {
            config.width = width;
        }
        if let Some(height) = cli.height {
            config.height = height;
        }
        if let Some(ticks_per_second) = cli.ticks_per_second {
            config.ticks_per_second = ticks_per_second;
        }
        if let Some(scale) = cli.scale {
            config.scale = scale;
        }

        Ok(config)
    }

    /// Initial window size in logical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (self.width * scale, self.height * scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_classic_canvas() {
        let config = AppConfig::default();

        assert_eq!(config.width, 426);
        assert_eq!(config.height, 240);
        assert_eq!(config.ticks_per_second, 60);
        assert_eq!(config.window_size(), (852, 480));
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli {
            width: Some(320),
            ticks_per_second: Some(30),
            ..Cli::default()
        };

        let config = AppConfig::resolve(&cli).unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.ticks_per_second, 30);
    }

    #[test]
    fn partial_json_keeps_defaults_for_the_rest() {
        let config: AppConfig = serde_json::from_str(r#"{"width": 64, "height": 64}"#).unwrap();

        assert_eq!(config.width, 64);
        assert_eq!(config.height, 64);
        assert_eq!(config.ticks_per_second, 60);
        assert_eq!(config.title, "pixel-loop");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig {
            width: 128,
            height: 72,
            ticks_per_second: 120,
            scale: 4,
            title: "demo".to_string(),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn zero_scale_still_yields_a_window() {
        let config = AppConfig {
            scale: 0,
            ..AppConfig::default()
        };

        assert_eq!(config.window_size(), (426, 240));
    }
}
