//! Error types for the playback API.
//!
//! Playback itself never fails: boundary navigation becomes a notice, missing
//! nodes complete synthetically and re-entrant commands are ignored. These errors
//! cover the fallible API surface around it (direct navigation, parsing, config).

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackError {
    /// Direct navigation to an index past the end of the deck
    #[error("Slide index {index} is out of range for a deck of {count} slides")]
    SlideOutOfRange { index: usize, count: usize },

    /// Direct navigation to a slide id the deck does not contain
    #[error("Slide not found: {id}")]
    UnknownSlide { id: String },

    /// Two slides in one deck share an id
    #[error("Duplicate slide id: {id}")]
    DuplicateSlide { id: String },

    /// An animation targets an element its slide does not contain
    #[error("Animation {animation_id} targets unknown element {element_id} on slide {slide_id}")]
    UnknownElement {
        slide_id: String,
        animation_id: String,
        element_id: String,
    },

    /// Auto-play interval of zero
    #[error("Auto-play interval must be greater than zero")]
    InvalidInterval,

    /// Configuration rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Command that needs listeners/timers while playback is not mounted
    #[error("Playback is not mounted")]
    NotMounted,

    /// Deck or config JSON could not be parsed
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },
}

impl PlaybackError {
    pub(crate) fn parse(what: &str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            what: what.to_string(),
            reason: err.to_string(),
        }
    }
}
