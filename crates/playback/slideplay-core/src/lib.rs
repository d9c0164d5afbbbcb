//! Slideplay Core (host-agnostic)
//!
//! Slide playback sequencer: groups slide animations into steps and drives them
//! forward and backward in response to keyboard, wheel, touch and timer input.
//! Hosts supply the slide deck through [`DeckStore`] and the visual effects
//! through [`EffectApplier`]; time is advanced explicitly with `Playback::tick`.

pub mod config;
pub mod data;
pub mod deck;
pub mod effects;
pub mod engine;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod latch;
pub mod outputs;
pub mod steps;
pub mod throttle;
pub mod timer;

// Re-exports for consumers (adapters)
pub use config::{InputConfig, PlaybackConfig};
pub use data::{Animation, AnimationKind, AnimationStep, AnimationTrigger, Slide, SlideElement};
pub use deck::{Deck, DeckStore};
pub use effects::{CompletionTicket, EffectApplier, EffectRequest};
pub use engine::{MountGuard, Playback, PlaybackCursor, PlaybackState};
pub use error::PlaybackError;
pub use ids::{DispatchId, TimerId};
pub use inputs::{Command, InputEvent, InputSource};
pub use outputs::{Notice, PlaybackEvent};
pub use steps::group_animations;
