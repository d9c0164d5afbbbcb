//! Visual effect applier contract.
//!
//! Playback never owns visual nodes. Hosts implement [`EffectApplier`] to locate
//! an element's node and start or clear an effect on it. Each started effect
//! carries a [`CompletionTicket`]; the host hands it back through
//! `Playback::complete` once the effect has finished.

use serde::{Deserialize, Serialize};

use crate::data::AnimationKind;
use crate::ids::DispatchId;

/// Identifies one animation of one dispatched step.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CompletionTicket {
    pub dispatch: DispatchId,
    pub slot: u32,
}

/// Effect to start on a located node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub element_id: String,
    /// Effect name with the configured class prefix applied (e.g. "animate__fadeIn").
    pub effect_name: String,
    pub duration_ms: u32,
    pub kind: AnimationKind,
}

/// Bridge to the rendering tree.
pub trait EffectApplier {
    /// Handle to a visual node; kept for the lifetime of the step it animates.
    type Node: Clone;

    /// Find the node rendering an element. `None` completes that animation at once.
    fn locate(&mut self, element_id: &str) -> Option<Self::Node>;

    /// Start an effect. The host must eventually pass `ticket` to `Playback::complete`.
    fn apply(&mut self, node: &Self::Node, request: &EffectRequest, ticket: CompletionTicket);

    /// Remove any transient effect state so the node shows its pre-animation look.
    fn clear(&mut self, node: &Self::Node);
}
