//! Grouping of a slide's raw animation list into playback steps.

use crate::data::{AnimationStep, AnimationTrigger, Slide};

/// Derive the ordered step index for a slide.
///
/// Animations targeting elements that are not on the slide are dropped. A click
/// (or the first animation) opens a new step; "with previous" joins the last step,
/// replacing an earlier animation of the same element in it; "after previous"
/// opens a new step and marks the one before it as auto-advancing.
pub fn group_animations(slide: &Slide) -> Vec<AnimationStep> {
    let mut steps: Vec<AnimationStep> = Vec::new();

    for animation in &slide.animations {
        if !slide.has_element(&animation.element_id) {
            continue;
        }
        match (animation.trigger, steps.last_mut()) {
            (AnimationTrigger::WithPrevious, Some(last)) => {
                last.animations.retain(|a| a.element_id != animation.element_id);
                last.animations.push(animation.clone());
            }
            (AnimationTrigger::AfterPrevious, Some(last)) => {
                last.auto_advance = true;
                steps.push(AnimationStep {
                    animations: vec![animation.clone()],
                    auto_advance: false,
                });
            }
            _ => steps.push(AnimationStep {
                animations: vec![animation.clone()],
                auto_advance: false,
            }),
        }
    }

    steps
}
