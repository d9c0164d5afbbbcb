#![cfg(target_arch = "wasm32")]
use js_sys::{Array, Function, Reflect};
use serde_json::json;
use serde_wasm_bindgen as swb;
use slideplay_wasm::{abi_version, SlidePlayback};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn test_deck() -> JsValue {
    let deck = json!({
        "slideIndex": 0,
        "slides": [
            {
                "id": "one",
                "elements": [{ "id": "title" }, { "id": "body" }],
                "animations": [
                    { "id": "a", "elId": "title", "effect": "fadeIn", "type": "in", "duration": 300, "trigger": "click" },
                    { "id": "b", "elId": "body", "effect": "fadeIn", "type": "in", "duration": 300, "trigger": "meantime" }
                ]
            },
            { "id": "two" }
        ]
    });
    swb::to_value(&deck).unwrap()
}

/// Builds a playback whose `apply` callback pushes tickets into the returned array.
fn playback_with_log(config: JsValue) -> (SlidePlayback, Array) {
    let tickets = Array::new();
    let locate = Function::new_with_args("id", "return id");
    let apply = Function::new_with_args("node, request, ticket", "this.push(ticket)").bind(&tickets);
    let clear = Function::new_with_args("node", "");
    let pb = SlidePlayback::new(test_deck(), config, locate, apply, clear).unwrap();
    (pb, tickets)
}

fn cursor_field(pb: &SlidePlayback, field: &str) -> f64 {
    let cursor = pb.cursor().unwrap();
    Reflect::get(&cursor, &JsValue::from_str(field))
        .unwrap()
        .as_f64()
        .unwrap()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn construct_with_defaults() {
    let (pb, _) = playback_with_log(JsValue::UNDEFINED);
    assert!(!pb.is_mounted());
}

#[wasm_bindgen_test]
fn rejects_invalid_config() {
    let cfg = swb::to_value(&json!({ "auto_play_interval_ms": 0 })).unwrap();
    let noop = Function::new_no_args("");
    assert!(SlidePlayback::new(test_deck(), cfg, noop.clone(), noop.clone(), noop).is_err());
}

#[wasm_bindgen_test]
fn advance_dispatches_and_completes_through_js() {
    let (mut pb, tickets) = playback_with_log(JsValue::NULL);
    pb.start();
    pb.advance();
    assert!(pb.is_animating());
    assert_eq!(tickets.length(), 2);
    assert_eq!(cursor_field(&pb, "step_index"), 1.0);

    for ticket in tickets.iter() {
        pb.complete(ticket).unwrap();
    }
    assert!(!pb.is_animating());

    pb.advance();
    assert_eq!(cursor_field(&pb, "slide_index"), 1.0);
    let events: Array = pb.drain_events().unwrap().into();
    assert!(events.length() >= 4);
}

#[wasm_bindgen_test]
fn inputs_and_navigation_errors() {
    let (mut pb, _) = playback_with_log(JsValue::NULL);
    assert!(pb.jump_to(0).is_err());
    pb.start();
    assert!(pb.jump_to(5).is_err());
    assert!(pb.jump_to_slide("two".into()).is_ok());
    assert!(pb.handle_key("ArrowUp".into(), 16.0));
    assert_eq!(cursor_field(&pb, "slide_index"), 0.0);

    let wheel = swb::to_value(&json!({ "type": "wheel", "delta_y": 120.0 })).unwrap();
    assert!(pb.handle_input(wheel, 20.0).unwrap());
    assert!(pb.handle_input(JsValue::from_str("nonsense"), 30.0).is_err());
}

#[wasm_bindgen_test]
fn key_presses_use_event_time_stamps() {
    let (mut pb, _) = playback_with_log(JsValue::NULL);
    pb.start();
    assert!(pb.handle_key("ArrowDown".into(), 1_000.0));
    assert!(!pb.handle_key("ArrowDown".into(), 1_050.0));
    assert!(pb.handle_key("ArrowDown".into(), 1_400.0));
}

#[wasm_bindgen_test]
fn auto_play_runs_on_tick() {
    let cfg = swb::to_value(&json!({ "auto_play_interval_ms": 100 })).unwrap();
    let (mut pb, _) = playback_with_log(cfg);
    pb.start();
    pb.jump_to(1).unwrap();
    pb.set_loop(true);
    pb.start_auto_play().unwrap();
    pb.tick(99.6);
    assert_eq!(cursor_field(&pb, "slide_index"), 0.0);
    pb.stop();
    assert!(!pb.is_mounted());
}
