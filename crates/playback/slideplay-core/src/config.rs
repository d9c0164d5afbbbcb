//! Playback configuration.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;

/// Configuration for one playback engine.
/// Every field has a default so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wrap around at either end of the deck instead of emitting a boundary notice.
    pub loop_playback: bool,
    /// Auto-play period in milliseconds.
    pub auto_play_interval_ms: u64,
    /// Window shared by the "first page" / "last page" notices.
    pub notice_throttle_ms: u64,
    /// Prepended to an animation's effect name before it is handed to the applier.
    pub effect_class_prefix: String,
    /// Play the current slide's first step on start() when it needs no click.
    pub dispatch_on_mount: bool,
    pub input: InputConfig,
}

/// Which input listeners start() registers, and their burst limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub keyboard: bool,
    pub wheel: bool,
    pub touch: bool,
    pub keyboard_throttle_ms: u64,
    pub wheel_throttle_ms: u64,
    pub touch_throttle_ms: u64,
    /// Minimum vertical travel (px) before a touch counts as a page swipe.
    pub min_swipe_distance: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            loop_playback: false,
            auto_play_interval_ms: 2500,
            notice_throttle_ms: 1000,
            effect_class_prefix: "animate__".to_string(),
            dispatch_on_mount: true,
            input: InputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            wheel: true,
            touch: true,
            keyboard_throttle_ms: 300,
            wheel_throttle_ms: 500,
            touch_throttle_ms: 300,
            min_swipe_distance: 50.0,
        }
    }
}

impl PlaybackConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, PlaybackError> {
        let cfg: PlaybackConfig =
            serde_json::from_str(json).map_err(|e| PlaybackError::parse("playback config", e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PlaybackError> {
        if self.auto_play_interval_ms == 0 {
            return Err(PlaybackError::InvalidInterval);
        }
        let d = self.input.min_swipe_distance;
        if !d.is_finite() || d < 0.0 {
            return Err(PlaybackError::InvalidConfig {
                reason: format!("min_swipe_distance must be finite and non-negative, got {d}"),
            });
        }
        Ok(())
    }
}
