//! Player configuration.

use crate::{Color, FrameSource, PlayerError, PlayerResult};

/// How progress is produced for the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DriveMode {
    /// Elapsed time since mount; plays through once and stops on the last frame
    #[default]
    Time,
    /// Scroll position within a pinned container
    Scroll,
}

/// Player settings, typically loaded from a `scrolly.toml`.
///
/// Every field has a default, so a partial file is fine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    pub source: FrameSource,
    pub drive: DriveMode,
    /// Paint rate for time-driven playback
    pub fps: u32,
    /// Spring frequency for smoothing scroll input; `None` maps raw scroll
    pub scroll_smoothing: Option<f64>,
    /// Fill used when no frame could be loaded
    pub background: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            source: FrameSource::default(),
            drive: DriveMode::Time,
            fps: 30,
            scroll_smoothing: None,
            background: "#121212".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Parse a TOML string into `PlayerConfig`.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> PlayerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PlayerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the player cannot run with.
    pub fn validate(&self) -> PlayerResult<()> {
        if self.source.frame_count == 0 {
            return Err(PlayerError::config("frame_count must be at least 1"));
        }
        if self.fps == 0 {
            return Err(PlayerError::config("fps must be at least 1"));
        }
        if let Some(omega) = self.scroll_smoothing {
            if !omega.is_finite() || omega <= 0.0 {
                return Err(PlayerError::config(format!("scroll_smoothing must be positive, got {omega}")));
            }
        }
        Ok(())
    }

    /// Parsed placeholder colour, falling back to the default backdrop.
    pub fn background_color(&self) -> Color {
        Color::parse_or_backdrop(&self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source.frame_count, 120);
        assert_eq!(config.fps, 30);
        assert_eq!(config.background_color(), Color::BACKDROP);
    }

    #[test]
    fn rejects_empty_sequence() {
        let mut config = PlayerConfig::default();
        config.source.frame_count = 0;
        assert!(matches!(config.validate(), Err(PlayerError::Config(_))));
    }

    #[test]
    fn rejects_zero_fps_and_bad_smoothing() {
        let config = PlayerConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PlayerConfig {
            scroll_smoothing: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_background_falls_back() {
        let config = PlayerConfig {
            background: "alsobad".into(),
            ..Default::default()
        };
        assert_eq!(config.background_color(), Color::BACKDROP);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parses_partial_toml() {
        let config = PlayerConfig::from_toml_str(
            r#"
            drive = "scroll"
            scroll_smoothing = 14.0

            [source]
            base_dir = "/hero"
            frame_count = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.drive, DriveMode::Scroll);
        assert_eq!(config.scroll_smoothing, Some(14.0));
        assert_eq!(config.source.base_dir, "/hero");
        assert_eq!(config.source.extension, "webp");
        assert_eq!(config.source.frame_count, 90);
        assert_eq!(config.fps, 30);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_validation_errors_surface() {
        let err = PlayerConfig::from_toml_str("fps = 0").unwrap_err();
        assert!(err.to_string().contains("fps"));
    }
}
