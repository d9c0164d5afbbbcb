use js_sys::{Function, JSON};
use log::warn;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use slideplay_core::{
    CompletionTicket, Deck, EffectApplier, EffectRequest, InputEvent, Playback, PlaybackConfig,
};

#[wasm_bindgen]
pub struct SlidePlayback {
    core: Playback<Deck, JsEffects>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(context: &str, e: impl std::fmt::Display) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

/// NaN and negatives become 0; `as` saturates large values.
fn whole_ms(v: f64) -> u64 {
    v.max(0.0).round() as u64
}

/// Effect applier backed by three JS callbacks. Nodes are whatever `locate` returns.
struct JsEffects {
    locate: Function,
    apply: Function,
    clear: Function,
}

impl EffectApplier for JsEffects {
    type Node = JsValue;

    fn locate(&mut self, element_id: &str) -> Option<JsValue> {
        match self.locate.call1(&JsValue::UNDEFINED, &JsValue::from_str(element_id)) {
            Ok(node) if !jsvalue_is_undefined_or_null(&node) => Some(node),
            Ok(_) => None,
            Err(e) => {
                warn!("locate({element_id}) threw: {e:?}");
                None
            }
        }
    }

    fn apply(&mut self, node: &JsValue, request: &EffectRequest, ticket: CompletionTicket) {
        let (request_js, ticket_js) = match (swb::to_value(request), swb::to_value(&ticket)) {
            (Ok(r), Ok(t)) => (r, t),
            (Err(e), _) | (_, Err(e)) => {
                warn!("effect request for {} not serializable: {e}", request.element_id);
                return;
            }
        };
        if let Err(e) = self
            .apply
            .call3(&JsValue::UNDEFINED, node, &request_js, &ticket_js)
        {
            warn!("apply({}) threw: {e:?}", request.effect_name);
        }
    }

    fn clear(&mut self, node: &JsValue) {
        if let Err(e) = self.clear.call1(&JsValue::UNDEFINED, node) {
            warn!("clear threw: {e:?}");
        }
    }
}

#[wasm_bindgen]
impl SlidePlayback {
    /// Create an unmounted playback engine.
    ///
    /// `deck` is `{ slides, slideIndex }` or a bare slide array. `config` is a
    /// partial PlaybackConfig object or undefined/null for defaults. Callbacks:
    /// - `locate(elementId) -> node | null`
    /// - `apply(node, { element_id, effect_name, duration_ms, kind }, ticket)`;
    ///   pass `ticket` back to `complete` when the effect ends
    /// - `clear(node)`
    #[wasm_bindgen(constructor)]
    pub fn new(
        deck: JsValue,
        config: JsValue,
        locate: Function,
        apply: Function,
        clear: Function,
    ) -> Result<SlidePlayback, JsError> {
        console_error_panic_hook::set_once();

        if jsvalue_is_undefined_or_null(&deck) {
            return Err(JsError::new("deck is null/undefined"));
        }
        // Stringify so the core parser handles both deck shapes.
        let deck_json = JSON::stringify(&deck)
            .map_err(|e| JsError::new(&format!("deck stringify error: {e:?}")))?
            .as_string()
            .ok_or_else(|| JsError::new("deck stringify produced non-string"))?;
        let deck = Deck::from_json(&deck_json).map_err(|e| js_err("deck error", e))?;

        let cfg: PlaybackConfig = if jsvalue_is_undefined_or_null(&config) {
            PlaybackConfig::default()
        } else {
            swb::from_value(config).map_err(|e| js_err("config error", e))?
        };

        let effects = JsEffects {
            locate,
            apply,
            clear,
        };
        Ok(SlidePlayback {
            core: Playback::new(cfg, deck, effects).map_err(|e| js_err("config error", e))?,
        })
    }

    /// Mount: register input handling and play an automatic first step.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.core.start();
    }

    /// Unmount: release input handling, the auto-play timer and any running step.
    #[wasm_bindgen]
    pub fn stop(&mut self) {
        self.core.stop();
    }

    #[wasm_bindgen]
    pub fn advance(&mut self) {
        self.core.advance();
    }

    #[wasm_bindgen]
    pub fn retreat(&mut self) {
        self.core.retreat();
    }

    #[wasm_bindgen(js_name = jump_to)]
    pub fn jump_to(&mut self, index: u32) -> Result<(), JsError> {
        self.core
            .jump_to(index as usize)
            .map_err(|e| js_err("jump_to", e))
    }

    #[wasm_bindgen(js_name = jump_to_slide)]
    pub fn jump_to_slide(&mut self, id: String) -> Result<(), JsError> {
        self.core
            .jump_to_slide(&id)
            .map_err(|e| js_err("jump_to_slide", e))
    }

    #[wasm_bindgen(js_name = set_loop)]
    pub fn set_loop(&mut self, enabled: bool) {
        self.core.set_loop(enabled);
    }

    #[wasm_bindgen(js_name = set_auto_play_interval)]
    pub fn set_auto_play_interval(&mut self, interval_ms: u32) -> Result<(), JsError> {
        self.core
            .set_auto_play_interval(interval_ms as u64)
            .map_err(|e| js_err("set_auto_play_interval", e))
    }

    /// Returns the id of the armed timer.
    #[wasm_bindgen(js_name = start_auto_play)]
    pub fn start_auto_play(&mut self) -> Result<u32, JsError> {
        self.core
            .start_auto_play()
            .map(|id| id.0)
            .map_err(|e| js_err("start_auto_play", e))
    }

    #[wasm_bindgen(js_name = stop_auto_play)]
    pub fn stop_auto_play(&mut self) {
        self.core.stop_auto_play();
    }

    /// Advance the playback clock by `dt_ms` milliseconds (fractions are rounded).
    #[wasm_bindgen]
    pub fn tick(&mut self, dt_ms: f64) {
        self.core.tick(whole_ms(dt_ms));
    }

    // Input handlers take the DOM `event.timeStamp` so rate limits hold without ticks.

    /// Forward a keyboard event's `key`. Returns true when it issued a command.
    #[wasm_bindgen(js_name = handle_key)]
    pub fn handle_key(&mut self, key: String, time_stamp: f64) -> bool {
        self.core
            .handle_input_at(&InputEvent::Key { key }, whole_ms(time_stamp))
            .is_some()
    }

    #[wasm_bindgen(js_name = handle_wheel)]
    pub fn handle_wheel(&mut self, delta_y: f64, time_stamp: f64) -> bool {
        self.core
            .handle_input_at(&InputEvent::Wheel { delta_y }, whole_ms(time_stamp))
            .is_some()
    }

    #[wasm_bindgen(js_name = touch_start)]
    pub fn touch_start(&mut self, x: f64, y: f64, time_stamp: f64) {
        self.core
            .handle_input_at(&InputEvent::TouchStart { x, y }, whole_ms(time_stamp));
    }

    #[wasm_bindgen(js_name = touch_end)]
    pub fn touch_end(&mut self, x: f64, y: f64, time_stamp: f64) -> bool {
        self.core
            .handle_input_at(&InputEvent::TouchEnd { x, y }, whole_ms(time_stamp))
            .is_some()
    }

    /// Forward any input event object, e.g. `{ type: "wheel", delta_y: 120 }`.
    #[wasm_bindgen(js_name = handle_input)]
    pub fn handle_input(&mut self, event: JsValue, time_stamp: f64) -> Result<bool, JsError> {
        let event: InputEvent = swb::from_value(event).map_err(|e| js_err("input error", e))?;
        Ok(self
            .core
            .handle_input_at(&event, whole_ms(time_stamp))
            .is_some())
    }

    /// Report that the effect started with `ticket` has ended.
    #[wasm_bindgen]
    pub fn complete(&mut self, ticket: JsValue) -> Result<(), JsError> {
        let ticket: CompletionTicket =
            swb::from_value(ticket).map_err(|e| js_err("ticket error", e))?;
        self.core.complete(ticket);
        Ok(())
    }

    /// Events emitted since the last call, as an array.
    #[wasm_bindgen(js_name = drain_events)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsError> {
        let events = self.core.drain_events();
        swb::to_value(&events).map_err(|e| js_err("events error", e))
    }

    /// `{ slide_index, step_index, animation_in_flight, min_visited_slide_index }`
    #[wasm_bindgen]
    pub fn cursor(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.cursor()).map_err(|e| js_err("cursor error", e))
    }

    #[wasm_bindgen(js_name = is_animating)]
    pub fn is_animating(&self) -> bool {
        self.core.is_animating()
    }

    #[wasm_bindgen(js_name = is_mounted)]
    pub fn is_mounted(&self) -> bool {
        self.core.is_mounted()
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
