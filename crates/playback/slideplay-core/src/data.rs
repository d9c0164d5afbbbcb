//! Deck data model: slides, their elements and element animations.
//!
//! Field names follow the authoring JSON format (`elId`, `type`, `duration`,
//! `trigger: click | meantime | auto`), so saved decks deserialize directly.

use serde::{Deserialize, Serialize};

/// What an animation does to its element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    #[serde(rename = "in")]
    Enter,
    #[serde(rename = "out")]
    Exit,
    /// Draws attention without a lasting visual change.
    #[serde(rename = "attention")]
    Emphasis,
}

/// When an animation fires relative to its neighbours.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AnimationTrigger {
    #[serde(rename = "click")]
    Click,
    #[serde(rename = "meantime")]
    WithPrevious,
    #[serde(rename = "auto")]
    AfterPrevious,
}

impl AnimationTrigger {
    /// True for triggers that fire without an explicit command.
    #[inline]
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::WithPrevious | Self::AfterPrevious)
    }
}

/// One element animation on a slide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "elId")]
    pub element_id: String,
    /// Effect name without the class prefix (e.g. "fadeIn").
    pub effect: String,
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    #[serde(rename = "duration")]
    pub duration_ms: u32,
    pub trigger: AnimationTrigger,
}

/// Only the id of a slide element matters to playback; other fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default)]
    pub elements: Vec<SlideElement>,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

impl Slide {
    pub fn has_element(&self, element_id: &str) -> bool {
        self.elements.iter().any(|el| el.id == element_id)
    }
}

/// A group of animations that play together as one unit of playback.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub animations: Vec<Animation>,
    /// The following step starts as soon as this one has completed.
    #[serde(rename = "autoNext", default)]
    pub auto_advance: bool,
}

impl AnimationStep {
    /// Emphasis-only steps leave no visual trace, so backward navigation skips them.
    /// An empty step counts as emphasis-only.
    pub fn is_emphasis_only(&self) -> bool {
        self.animations.iter().all(|a| a.kind == AnimationKind::Emphasis)
    }

    /// True when the step has animations and none of them waits for a click.
    pub fn is_automatic(&self) -> bool {
        !self.animations.is_empty() && self.animations.iter().all(|a| a.trigger.is_automatic())
    }
}
