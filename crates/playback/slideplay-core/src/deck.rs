//! Slide-deck store contract and the default in-memory deck.
//!
//! Playback never mutates slide content. It reads the slide list, the current
//! index and the current slide's step index through [`DeckStore`], and writes
//! back only the current index.

use hashbrown::HashMap;
use serde::Deserialize;

use crate::data::{Animation, AnimationStep, Slide};
use crate::error::PlaybackError;
use crate::steps::group_animations;

/// Shared slide-deck store. Hosts with their own store implement this; [`Deck`] is
/// the default implementation.
pub trait DeckStore {
    fn slide_count(&self) -> usize;
    fn current_slide_index(&self) -> usize;
    fn set_current_slide_index(&mut self, index: usize);
    /// Position of the slide with the given id.
    fn slide_position(&self, id: &str) -> Option<usize>;
    /// Step index of the current slide, as of now.
    fn current_steps(&self) -> &[AnimationStep];
}

/// In-memory deck with cached per-slide step indices.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
    steps: Vec<Vec<AnimationStep>>,
    positions: HashMap<String, usize>,
    current: usize,
}

#[derive(Deserialize)]
struct DeckDocument {
    slides: Vec<Slide>,
    #[serde(default, rename = "slideIndex")]
    slide_index: usize,
}

impl Deck {
    /// Build a deck, rejecting duplicate slide ids.
    pub fn new(slides: Vec<Slide>) -> Result<Self, PlaybackError> {
        let mut positions = HashMap::with_capacity(slides.len());
        for (idx, slide) in slides.iter().enumerate() {
            if positions.insert(slide.id.clone(), idx).is_some() {
                return Err(PlaybackError::DuplicateSlide {
                    id: slide.id.clone(),
                });
            }
        }
        let steps = slides.iter().map(group_animations).collect();
        Ok(Self {
            slides,
            steps,
            positions,
            current: 0,
        })
    }

    /// Parse a deck document: `{ "slides": [...], "slideIndex": 0 }` or a bare slide array.
    pub fn from_json(json: &str) -> Result<Self, PlaybackError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| PlaybackError::parse("deck", e))?;
        let (slides, start) = if value.is_array() {
            let slides: Vec<Slide> =
                serde_json::from_value(value).map_err(|e| PlaybackError::parse("deck", e))?;
            (slides, 0)
        } else {
            let doc: DeckDocument =
                serde_json::from_value(value).map_err(|e| PlaybackError::parse("deck", e))?;
            (doc.slides, doc.slide_index)
        };
        let mut deck = Self::new(slides)?;
        deck.set_current_slide_index(start);
        Ok(deck)
    }

    /// Strict check that every animation targets an element of its slide.
    /// Grouping tolerates dangling animations by dropping them; authoring tools may
    /// want to reject them instead.
    pub fn validate_animations(&self) -> Result<(), PlaybackError> {
        for slide in &self.slides {
            if let Some(anim) = slide
                .animations
                .iter()
                .find(|a| !slide.has_element(&a.element_id))
            {
                return Err(PlaybackError::UnknownElement {
                    slide_id: slide.id.clone(),
                    animation_id: anim.id.clone(),
                    element_id: anim.element_id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Step index for any slide.
    pub fn steps(&self, index: usize) -> &[AnimationStep] {
        self.steps.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace a slide's animations and recompute its step index.
    pub fn set_slide_animations(
        &mut self,
        index: usize,
        animations: Vec<Animation>,
    ) -> Result<(), PlaybackError> {
        let count = self.slides.len();
        let slide = self
            .slides
            .get_mut(index)
            .ok_or(PlaybackError::SlideOutOfRange { index, count })?;
        slide.animations = animations;
        self.steps[index] = group_animations(slide);
        Ok(())
    }
}

impl DeckStore for Deck {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn current_slide_index(&self) -> usize {
        self.current
    }

    fn set_current_slide_index(&mut self, index: usize) {
        self.current = index.min(self.slides.len().saturating_sub(1));
    }

    fn slide_position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    fn current_steps(&self) -> &[AnimationStep] {
        self.steps(self.current)
    }
}
