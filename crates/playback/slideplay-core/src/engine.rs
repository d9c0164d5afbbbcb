//! Playback engine: cursor ownership, step dispatch/revoke, lifecycle and timer.
//!
//! Methods:
//! - start/stop/mount (listener + timer registration), advance/retreat, complete
//! - jump_to/jump_to_slide, auto-play control, tick (clock + timer), handle_input

use std::fmt;
use std::ops::{Deref, DerefMut};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::{InputConfig, PlaybackConfig};
use crate::data::{AnimationKind, AnimationStep};
use crate::deck::DeckStore;
use crate::effects::{CompletionTicket, EffectApplier, EffectRequest};
use crate::error::PlaybackError;
use crate::ids::{DispatchId, IdAllocator, TimerId};
use crate::inputs::{Command, InputAdapters, InputEvent, InputSource};
use crate::latch::CompletionLatch;
use crate::outputs::{Notice, Outputs, PlaybackEvent};
use crate::throttle::LeadingEdge;
use crate::timer::AutoPlayTimer;

/// Position of playback within the deck.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlaybackCursor {
    pub slide_index: usize,
    /// Number of steps of the current slide already played.
    pub step_index: usize,
    pub animation_in_flight: bool,
    /// Lowest slide index displayed since start().
    pub min_visited_slide_index: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Animating,
}

/// Input listeners currently registered.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
struct Listeners {
    keyboard: bool,
    wheel: bool,
    touch: bool,
}

impl Listeners {
    fn from_config(cfg: &InputConfig) -> Self {
        Self {
            keyboard: cfg.keyboard,
            wheel: cfg.wheel,
            touch: cfg.touch,
        }
    }

    fn contains(&self, source: InputSource) -> bool {
        match source {
            InputSource::Keyboard => self.keyboard,
            InputSource::Wheel => self.wheel,
            InputSource::Touch => self.touch,
        }
    }
}

/// Step whose effects were started and which awaits completions.
struct InFlight<N> {
    dispatch: DispatchId,
    step_index: usize,
    auto_advance: bool,
    latch: CompletionLatch,
    /// Per slot: the located node and the animation kind, or None if not found.
    targets: Vec<Option<(N, AnimationKind)>>,
}

enum Dispatch {
    /// No pending step, or one is already in flight.
    Nothing,
    /// Effects started; completion arrives later.
    Pending,
    /// Every animation completed synchronously (empty step or no nodes found).
    Settled { auto_advance: bool },
}

/// Where to land when entering a slide.
#[derive(Copy, Clone, Debug)]
enum Landing {
    Start,
    End,
}

/// Playback state machine over a deck store and an effect applier.
pub struct Playback<S: DeckStore, E: EffectApplier> {
    cfg: PlaybackConfig,
    store: S,
    effects: E,

    cursor: PlaybackCursor,
    in_flight: Option<InFlight<E::Node>>,
    ids: IdAllocator,

    // Lifecycle-scoped registrations
    mounted: bool,
    listeners: Listeners,
    timer: AutoPlayTimer,

    inputs: InputAdapters,
    notices: LeadingEdge<()>,
    /// Tick-driven clock; schedules auto-play.
    clock_ms: u64,
    /// Latest time seen from ticks or input timestamps; drives rate limits.
    input_clock_ms: u64,
    outputs: Outputs,
}

impl<S: DeckStore, E: EffectApplier> fmt::Debug for Playback<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Playback")
            .field("cursor", &self.cursor)
            .field("mounted", &self.mounted)
            .field("listeners", &self.listeners)
            .field("timer", &self.timer.active())
            .field("clock_ms", &self.clock_ms)
            .finish_non_exhaustive()
    }
}

impl<S: DeckStore, E: EffectApplier> Playback<S, E> {
    /// Create an unmounted engine. Nothing plays and no input is accepted until start().
    /// The config is validated first.
    pub fn new(cfg: PlaybackConfig, store: S, effects: E) -> Result<Self, PlaybackError> {
        cfg.validate()?;
        let slide_index = store.current_slide_index();
        Ok(Self {
            inputs: InputAdapters::new(&cfg.input),
            notices: LeadingEdge::new(cfg.notice_throttle_ms),
            cfg,
            store,
            effects,
            cursor: PlaybackCursor {
                slide_index,
                step_index: 0,
                animation_in_flight: false,
                min_visited_slide_index: slide_index,
            },
            in_flight: None,
            ids: IdAllocator::new(),
            mounted: false,
            listeners: Listeners::default(),
            timer: AutoPlayTimer::new(),
            clock_ms: 0,
            input_clock_ms: 0,
            outputs: Outputs::default(),
        })
    }

    // --- Lifecycle -------------------------------------------------------

    /// Mount: reset the cursor to the store's current slide, register input
    /// listeners, and play the first step if it needs no click. Idempotent.
    pub fn start(&mut self) {
        if self.mounted {
            trace!("start ignored: already mounted");
            return;
        }
        let slide_index = self.store.current_slide_index();
        self.cursor = PlaybackCursor {
            slide_index,
            step_index: 0,
            animation_in_flight: false,
            min_visited_slide_index: slide_index,
        };
        self.in_flight = None;
        self.inputs = InputAdapters::new(&self.cfg.input);
        self.notices.reset();
        self.listeners = Listeners::from_config(&self.cfg.input);
        self.mounted = true;
        debug!(
            "playback mounted at slide {slide_index}, listeners {:?}",
            self.listeners
        );
        self.outputs.push_event(PlaybackEvent::Mounted { slide_index });

        let first_is_automatic = self
            .store
            .current_steps()
            .first()
            .is_some_and(AnimationStep::is_automatic);
        if self.cfg.dispatch_on_mount && first_is_automatic {
            self.play_steps();
        }
    }

    /// Unmount: disarm the timer, release every listener and abandon any step in
    /// flight. Completions for that step are ignored from here on. Idempotent.
    pub fn stop(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(timer) = self.timer.disarm() {
            self.outputs.push_event(PlaybackEvent::AutoPlayStopped { timer });
        }
        self.listeners = Listeners::default();
        self.clear_in_flight();
        self.mounted = false;
        debug!("playback unmounted at slide {}", self.cursor.slide_index);
        self.outputs.push_event(PlaybackEvent::Unmounted);
    }

    /// start() now, stop() when the guard is dropped, on every exit path.
    pub fn mount(&mut self) -> MountGuard<'_, S, E> {
        self.start();
        MountGuard { playback: self }
    }

    // --- Commands --------------------------------------------------------

    /// Play the next step of the current slide, or move to the next slide once
    /// every step has played. Ignored while a step is in flight.
    pub fn advance(&mut self) {
        if !self.accepts_commands("advance") {
            return;
        }
        if self.in_flight.is_some() {
            trace!("advance ignored: step in flight");
            return;
        }
        if self.clamp_step_index() > self.cursor.step_index {
            self.play_steps();
            return;
        }

        let slide_index = self.cursor.slide_index;
        if slide_index + 1 < self.store.slide_count() {
            self.enter_slide(slide_index + 1, Landing::Start);
        } else if self.cfg.loop_playback {
            self.enter_slide(0, Landing::Start);
        } else {
            self.notify_boundary(Notice::LastPage);
            self.stop_auto_play();
        }
    }

    /// Revoke the last played step of the current slide, or move to the previous
    /// slide. Steps made only of emphasis animations are revoked transparently.
    /// Always leaves playback idle.
    pub fn retreat(&mut self) {
        if !self.accepts_commands("retreat") {
            return;
        }
        loop {
            self.clamp_step_index();
            if self.cursor.step_index > 0 {
                if self.revoke_step() {
                    continue;
                }
                break;
            }

            let slide_index = self.cursor.slide_index;
            if slide_index > 0 {
                let target = slide_index - 1;
                let landing = if target < self.cursor.min_visited_slide_index {
                    self.cursor.min_visited_slide_index = target;
                    Landing::Start
                } else {
                    Landing::End
                };
                self.enter_slide(target, landing);
            } else if self.cfg.loop_playback {
                let last = self.store.slide_count() - 1;
                self.enter_slide(last, Landing::End);
            } else {
                self.notify_boundary(Notice::FirstPage);
            }
            break;
        }
        self.clear_in_flight();
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Advance => self.advance(),
            Command::Retreat => self.retreat(),
        }
    }

    /// Report that the effect started with `ticket` has finished. Stale and
    /// duplicate tickets are ignored.
    pub fn complete(&mut self, ticket: CompletionTicket) {
        let Some(flight) = self.in_flight.as_mut() else {
            trace!("completion {ticket:?} ignored: nothing in flight");
            return;
        };
        if flight.dispatch != ticket.dispatch {
            trace!("completion {ticket:?} ignored: stale dispatch");
            return;
        }
        let slot = ticket.slot as usize;
        if !flight.latch.complete(slot) {
            trace!("completion {ticket:?} ignored: duplicate");
            return;
        }
        // Exit effects stay applied so the element remains hidden.
        if let Some(Some((node, kind))) = flight.targets.get(slot) {
            if *kind != AnimationKind::Exit {
                self.effects.clear(node);
            }
        }
        if !flight.latch.is_resolved() {
            return;
        }

        let step_index = flight.step_index;
        let auto_advance = flight.auto_advance;
        self.clear_in_flight();
        self.outputs.push_event(PlaybackEvent::StepCompleted {
            slide_index: self.cursor.slide_index,
            step_index,
        });
        if auto_advance {
            self.play_steps();
        }
    }

    /// Show a slide directly at its first step, skipping its entrance animations.
    pub fn jump_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        if !self.mounted {
            return Err(PlaybackError::NotMounted);
        }
        let count = self.store.slide_count();
        if index >= count {
            return Err(PlaybackError::SlideOutOfRange { index, count });
        }
        self.enter_slide(index, Landing::Start);
        Ok(())
    }

    pub fn jump_to_slide(&mut self, id: &str) -> Result<(), PlaybackError> {
        let index = self
            .store
            .slide_position(id)
            .ok_or_else(|| PlaybackError::UnknownSlide { id: id.to_string() })?;
        self.jump_to(index)
    }

    /// Next slide at its first step; a boundary notice on the last slide.
    pub fn skip_to_next_slide(&mut self) {
        if !self.accepts_commands("skip_to_next_slide") {
            return;
        }
        let target = self.cursor.slide_index + 1;
        if target < self.store.slide_count() {
            self.enter_slide(target, Landing::Start);
        } else {
            self.notify_boundary(Notice::LastPage);
        }
    }

    /// Previous slide at its first step; a boundary notice on the first slide.
    pub fn skip_to_previous_slide(&mut self) {
        if !self.accepts_commands("skip_to_previous_slide") {
            return;
        }
        match self.cursor.slide_index.checked_sub(1) {
            Some(target) => self.enter_slide(target, Landing::Start),
            None => self.notify_boundary(Notice::FirstPage),
        }
    }

    // --- Configuration and auto-play -------------------------------------

    pub fn set_loop(&mut self, enabled: bool) {
        self.cfg.loop_playback = enabled;
    }

    /// Change the auto-play period. A running timer is restarted with it.
    pub fn set_auto_play_interval(&mut self, interval_ms: u64) -> Result<(), PlaybackError> {
        if interval_ms == 0 {
            return Err(PlaybackError::InvalidInterval);
        }
        self.cfg.auto_play_interval_ms = interval_ms;
        if self.timer.is_armed() {
            self.start_auto_play()?;
        }
        Ok(())
    }

    /// Arm the auto-play timer, replacing any running one.
    pub fn start_auto_play(&mut self) -> Result<TimerId, PlaybackError> {
        if !self.mounted {
            return Err(PlaybackError::NotMounted);
        }
        if let Some(previous) = self.timer.disarm() {
            debug!("auto-play timer {previous:?} replaced");
        }
        let id = self
            .timer
            .arm(self.clock_ms, self.cfg.auto_play_interval_ms);
        debug!(
            "auto-play timer {id:?} armed every {} ms",
            self.cfg.auto_play_interval_ms
        );
        self.outputs
            .push_event(PlaybackEvent::Notice(Notice::AutoPlayStarted));
        Ok(id)
    }

    pub fn stop_auto_play(&mut self) {
        if let Some(timer) = self.timer.disarm() {
            debug!("auto-play timer {timer:?} stopped");
            self.outputs
                .push_event(PlaybackEvent::AutoPlayStopped { timer });
        }
    }

    // --- Host drivers ----------------------------------------------------

    /// Advance the engine clock and fire every auto-play period that came due.
    pub fn tick(&mut self, dt_ms: u64) {
        self.clock_ms = self.clock_ms.saturating_add(dt_ms);
        self.input_clock_ms = self.input_clock_ms.saturating_add(dt_ms);
        if !self.mounted {
            return;
        }
        while self.timer.poll(self.clock_ms).is_some() {
            self.advance();
        }
    }

    /// Route a raw input event through its adapter, rate-limited against the
    /// latest known time. Hosts that do not tick should use [`Self::handle_input_at`].
    /// Returns the command issued, if any.
    pub fn handle_input(&mut self, event: &InputEvent) -> Option<Command> {
        self.handle_input_at(event, self.input_clock_ms)
    }

    /// Route a raw input event stamped with the host's event time in
    /// milliseconds (e.g. DOM `event.timeStamp`). Stamps older than the latest
    /// known time are treated as arriving now.
    pub fn handle_input_at(&mut self, event: &InputEvent, at_ms: u64) -> Option<Command> {
        let source = event.source();
        if !self.mounted {
            warn!("{source:?} input ignored: playback is not mounted");
            return None;
        }
        if !self.listeners.contains(source) {
            trace!("{source:?} input dropped: no listener registered");
            return None;
        }
        self.input_clock_ms = self.input_clock_ms.max(at_ms);
        let Some(command) = self.inputs.translate(event, self.input_clock_ms) else {
            trace!("{source:?} input produced no command");
            return None;
        };
        self.execute(command);
        Some(command)
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.outputs.take()
    }

    // --- Introspection ---------------------------------------------------

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        if self.in_flight.is_some() {
            PlaybackState::Animating
        } else {
            PlaybackState::Idle
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_listening(&self, source: InputSource) -> bool {
        self.mounted && self.listeners.contains(source)
    }

    pub fn loop_enabled(&self) -> bool {
        self.cfg.loop_playback
    }

    pub fn auto_play_interval_ms(&self) -> u64 {
        self.cfg.auto_play_interval_ms
    }

    /// Id of the armed auto-play timer; at most one exists at a time.
    pub fn auto_play_timer(&self) -> Option<TimerId> {
        self.timer.active()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.cfg
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access for content updates. Navigate with the playback
    /// commands rather than by setting the store's index here.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    // --- Internals -------------------------------------------------------

    fn accepts_commands(&self, command: &str) -> bool {
        if !self.mounted {
            warn!("{command} ignored: playback is not mounted");
            return false;
        }
        if self.store.slide_count() == 0 {
            trace!("{command} ignored: empty deck");
            return false;
        }
        true
    }

    /// Keep the step cursor inside the current step index (it may have been
    /// recomputed since the cursor last moved). Returns the step count.
    fn clamp_step_index(&mut self) -> usize {
        let len = self.store.current_steps().len();
        if self.cursor.step_index > len {
            self.cursor.step_index = len;
        }
        len
    }

    fn clear_in_flight(&mut self) {
        self.in_flight = None;
        self.cursor.animation_in_flight = false;
    }

    fn notify_boundary(&mut self, notice: Notice) {
        if self.notices.admit((), self.input_clock_ms) {
            self.outputs.push_event(PlaybackEvent::Notice(notice));
        } else {
            trace!("{notice:?} notice throttled");
        }
    }

    fn enter_slide(&mut self, index: usize, landing: Landing) {
        let from = self.cursor.slide_index;
        self.store.set_current_slide_index(index);
        let to = self.store.current_slide_index();
        self.cursor.slide_index = to;
        self.cursor.step_index = match landing {
            Landing::Start => 0,
            Landing::End => self.store.current_steps().len(),
        };
        self.clear_in_flight();
        debug!(
            "slide {from} -> {to} at step {} ({landing:?})",
            self.cursor.step_index
        );
        self.outputs.push_event(PlaybackEvent::SlideChanged {
            from,
            to,
            step_index: self.cursor.step_index,
        });
    }

    /// Dispatch pending steps of the current slide. Auto-advancing steps that
    /// settle synchronously chain into the next step without recursion.
    fn play_steps(&mut self) {
        while let Dispatch::Settled { auto_advance: true } = self.dispatch_next_step() {}
    }

    fn dispatch_next_step(&mut self) -> Dispatch {
        if self.in_flight.is_some() {
            return Dispatch::Nothing;
        }
        let step_index = self.cursor.step_index;
        let slide_index = self.cursor.slide_index;
        let Some(step) = self.store.current_steps().get(step_index) else {
            return Dispatch::Nothing;
        };
        self.cursor.step_index += 1;

        let dispatch = self.ids.alloc_dispatch();
        let mut latch = CompletionLatch::new(step.animations.len());
        let mut targets = Vec::with_capacity(step.animations.len());
        for (slot, animation) in step.animations.iter().enumerate() {
            let Some(node) = self.effects.locate(&animation.element_id) else {
                warn!(
                    "element {} not found on slide {slide_index}; completing its animation",
                    animation.element_id
                );
                latch.complete(slot);
                targets.push(None);
                continue;
            };
            let request = EffectRequest {
                element_id: animation.element_id.clone(),
                effect_name: format!("{}{}", self.cfg.effect_class_prefix, animation.effect),
                duration_ms: animation.duration_ms,
                kind: animation.kind,
            };
            let ticket = CompletionTicket {
                dispatch,
                slot: slot as u32,
            };
            self.effects.clear(&node);
            self.effects.apply(&node, &request, ticket);
            targets.push(Some((node, animation.kind)));
        }

        let auto_advance = step.auto_advance;
        let animations = step.animations.len();
        debug!("slide {slide_index} step {step_index} dispatched ({animations} animations)");
        self.outputs.push_event(PlaybackEvent::StepDispatched {
            slide_index,
            step_index,
            animations,
        });

        if latch.is_resolved() {
            self.outputs.push_event(PlaybackEvent::StepCompleted {
                slide_index,
                step_index,
            });
            return Dispatch::Settled { auto_advance };
        }
        self.in_flight = Some(InFlight {
            dispatch,
            step_index,
            auto_advance,
            latch,
            targets,
        });
        self.cursor.animation_in_flight = true;
        Dispatch::Pending
    }

    /// Step back one step and clear the effects it left. Returns true when the
    /// step held only emphasis animations.
    fn revoke_step(&mut self) -> bool {
        self.cursor.step_index -= 1;
        let step_index = self.cursor.step_index;
        let slide_index = self.cursor.slide_index;
        let Some(step) = self.store.current_steps().get(step_index) else {
            return false;
        };
        for animation in &step.animations {
            if let Some(node) = self.effects.locate(&animation.element_id) {
                self.effects.clear(&node);
            }
        }
        debug!("slide {slide_index} step {step_index} revoked");
        self.outputs.push_event(PlaybackEvent::StepRevoked {
            slide_index,
            step_index,
        });
        step.is_emphasis_only()
    }
}

/// Keeps playback mounted for its lifetime.
pub struct MountGuard<'a, S: DeckStore, E: EffectApplier> {
    playback: &'a mut Playback<S, E>,
}

impl<S: DeckStore, E: EffectApplier> Deref for MountGuard<'_, S, E> {
    type Target = Playback<S, E>;

    fn deref(&self) -> &Self::Target {
        self.playback
    }
}

impl<S: DeckStore, E: EffectApplier> DerefMut for MountGuard<'_, S, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.playback
    }
}

impl<S: DeckStore, E: EffectApplier> Drop for MountGuard<'_, S, E> {
    fn drop(&mut self) {
        self.playback.stop();
    }
}
