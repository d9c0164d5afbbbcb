//! Output contracts from the playback engine.
//!
//! Commands do not return values; everything observable beyond the cursor is
//! queued as a [`PlaybackEvent`] and drained by the host.

use serde::{Deserialize, Serialize};

use crate::ids::TimerId;

/// User-visible, non-fatal messages.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Notice {
    FirstPage,
    LastPage,
    AutoPlayStarted,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::FirstPage => "This is the first page",
            Notice::LastPage => "This is the last page",
            Notice::AutoPlayStarted => "Start auto play",
        }
    }
}

/// Discrete semantic signals emitted by playback commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackEvent {
    Mounted {
        slide_index: usize,
    },
    Unmounted,
    SlideChanged {
        from: usize,
        to: usize,
        step_index: usize,
    },
    StepDispatched {
        slide_index: usize,
        step_index: usize,
        animations: usize,
    },
    StepCompleted {
        slide_index: usize,
        step_index: usize,
    },
    StepRevoked {
        slide_index: usize,
        step_index: usize,
    },
    Notice(Notice),
    AutoPlayStopped {
        timer: TimerId,
    },
}

/// Event queue filled by commands and drained by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<PlaybackEvent>,
}

impl Outputs {
    #[inline]
    pub fn push_event(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn take(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }
}
