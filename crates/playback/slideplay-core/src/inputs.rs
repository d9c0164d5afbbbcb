//! Input contracts and adapters.
//!
//! Hosts forward raw keyboard, wheel and touch events; the adapters here turn
//! them into the two playback commands and suppress bursts so one physical
//! gesture issues at most one command.

use serde::{Deserialize, Serialize};

use crate::config::InputConfig;
use crate::throttle::LeadingEdge;

/// The only two commands input sources can issue.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Command {
    Advance,
    Retreat,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    Wheel,
    Touch,
}

/// Raw input as delivered by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// `key` is the logical key value (DOM `KeyboardEvent.key` naming).
    Key { key: String },
    Wheel { delta_y: f64 },
    TouchStart { x: f64, y: f64 },
    TouchEnd { x: f64, y: f64 },
}

impl InputEvent {
    pub fn source(&self) -> InputSource {
        match self {
            InputEvent::Key { .. } => InputSource::Keyboard,
            InputEvent::Wheel { .. } => InputSource::Wheel,
            InputEvent::TouchStart { .. } | InputEvent::TouchEnd { .. } => InputSource::Touch,
        }
    }
}

/// Keys recognised for paging.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Space,
    Enter,
}

impl LogicalKey {
    /// Case-insensitive lookup of a logical key name.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        let parsed = match key.as_str() {
            "ARROWUP" => Self::Up,
            "ARROWDOWN" => Self::Down,
            "ARROWLEFT" => Self::Left,
            "ARROWRIGHT" => Self::Right,
            "PAGEUP" => Self::PageUp,
            "PAGEDOWN" => Self::PageDown,
            " " => Self::Space,
            "ENTER" => Self::Enter,
            _ => return None,
        };
        Some(parsed)
    }

    pub fn command(self) -> Command {
        match self {
            Self::Up | Self::Left | Self::PageUp => Command::Retreat,
            Self::Down | Self::Right | Self::PageDown | Self::Space | Self::Enter => {
                Command::Advance
            }
        }
    }
}

#[derive(Debug)]
pub struct KeyboardAdapter {
    limiter: LeadingEdge<Command>,
}

impl KeyboardAdapter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            limiter: LeadingEdge::new(window_ms),
        }
    }

    pub fn on_key(&mut self, key: &str, now_ms: u64) -> Option<Command> {
        let command = LogicalKey::parse(key)?.command();
        self.limiter.admit(command, now_ms).then_some(command)
    }
}

#[derive(Debug)]
pub struct WheelAdapter {
    limiter: LeadingEdge<Command>,
}

impl WheelAdapter {
    pub fn new(window_ms: u64) -> Self {
        Self {
            limiter: LeadingEdge::new(window_ms),
        }
    }

    pub fn on_wheel(&mut self, delta_y: f64, now_ms: u64) -> Option<Command> {
        let command = if delta_y < 0.0 {
            Command::Retreat
        } else if delta_y > 0.0 {
            Command::Advance
        } else {
            return None;
        };
        self.limiter.admit(command, now_ms).then_some(command)
    }
}

/// Vertical swipe recogniser.
#[derive(Debug)]
pub struct TouchAdapter {
    limiter: LeadingEdge<Command>,
    min_distance: f64,
    start: Option<(f64, f64)>,
}

impl TouchAdapter {
    pub fn new(window_ms: u64, min_distance: f64) -> Self {
        Self {
            limiter: LeadingEdge::new(window_ms),
            min_distance,
            start: None,
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// A swipe needs more vertical than horizontal travel, and more than the
    /// minimum distance. Swiping down retreats, swiping up advances. A touch that
    /// is not a swipe keeps its start point.
    pub fn on_touch_end(&mut self, x: f64, y: f64, now_ms: u64) -> Option<Command> {
        let (sx, sy) = self.start?;
        let offset_x = (sx - x).abs();
        let offset_y = y - sy;
        if offset_y.abs() <= offset_x || offset_y.abs() <= self.min_distance {
            return None;
        }
        self.start = None;
        let command = if offset_y > 0.0 {
            Command::Retreat
        } else {
            Command::Advance
        };
        self.limiter.admit(command, now_ms).then_some(command)
    }
}

/// All three adapters with their per-source limiters.
#[derive(Debug)]
pub struct InputAdapters {
    pub keyboard: KeyboardAdapter,
    pub wheel: WheelAdapter,
    pub touch: TouchAdapter,
}

impl InputAdapters {
    pub fn new(cfg: &InputConfig) -> Self {
        Self {
            keyboard: KeyboardAdapter::new(cfg.keyboard_throttle_ms),
            wheel: WheelAdapter::new(cfg.wheel_throttle_ms),
            touch: TouchAdapter::new(cfg.touch_throttle_ms, cfg.min_swipe_distance),
        }
    }

    pub fn translate(&mut self, event: &InputEvent, now_ms: u64) -> Option<Command> {
        match event {
            InputEvent::Key { key } => self.keyboard.on_key(key, now_ms),
            InputEvent::Wheel { delta_y } => self.wheel.on_wheel(*delta_y, now_ms),
            InputEvent::TouchStart { x, y } => {
                self.touch.on_touch_start(*x, *y);
                None
            }
            InputEvent::TouchEnd { x, y } => self.touch.on_touch_end(*x, *y, now_ms),
        }
    }
}
