mod support;

use slideplay_core::{
    Command, InputConfig, InputEvent, InputSource, Notice, Playback, PlaybackConfig,
    PlaybackError,
};
use support::{deck, notices, playback, position, started, Recorder};

fn key(k: &str) -> InputEvent {
    InputEvent::Key { key: k.into() }
}

fn wheel(delta_y: f64) -> InputEvent {
    InputEvent::Wheel { delta_y }
}

fn swipe(from: (f64, f64), to: (f64, f64)) -> [InputEvent; 2] {
    [
        InputEvent::TouchStart {
            x: from.0,
            y: from.1,
        },
        InputEvent::TouchEnd { x: to.0, y: to.1 },
    ]
}

#[test]
fn keys_page_forward_and_back() {
    let mut pb = started("plain-deck");
    assert_eq!(pb.handle_input(&key("ArrowDown")), Some(Command::Advance));
    assert_eq!(position(&pb), (1, 0));
    assert_eq!(pb.handle_input(&key("ArrowUp")), Some(Command::Retreat));
    assert_eq!(position(&pb), (0, 0));
    assert_eq!(pb.handle_input(&key("Escape")), None);
}

/// it should drop a repeated key command inside the keyboard window
#[test]
fn key_repeats_are_throttled() {
    let mut pb = started("plain-deck");
    assert_eq!(pb.handle_input(&key("PageDown")), Some(Command::Advance));
    assert_eq!(pb.handle_input(&key("Enter")), None);
    assert_eq!(position(&pb), (1, 0));

    pb.tick(300);
    assert_eq!(pb.handle_input(&key(" ")), Some(Command::Advance));
    assert_eq!(position(&pb), (2, 0));
}

/// it should rate-limit by event time when the host never ticks
#[test]
fn stamped_key_presses_page_without_ticks() {
    let mut pb = started("plain-deck");
    assert_eq!(
        pb.handle_input_at(&key("ArrowRight"), 1_000),
        Some(Command::Advance)
    );
    assert_eq!(pb.handle_input_at(&key("ArrowRight"), 1_100), None);
    assert_eq!(
        pb.handle_input_at(&key("ArrowRight"), 1_400),
        Some(Command::Advance)
    );
    assert_eq!(position(&pb), (2, 0));
    assert_eq!(pb.now_ms(), 0);
}

#[test]
fn stale_stamps_do_not_rewind_the_input_clock() {
    let mut pb = started("plain-deck");
    assert_eq!(
        pb.handle_input_at(&key("ArrowDown"), 5_000),
        Some(Command::Advance)
    );
    assert_eq!(pb.handle_input_at(&key("ArrowDown"), 10), None);
    assert_eq!(pb.handle_input(&key("ArrowDown")), None);
    assert_eq!(position(&pb), (1, 0));

    pb.tick(300);
    assert_eq!(pb.handle_input(&key("ArrowDown")), Some(Command::Advance));
    assert_eq!(position(&pb), (2, 0));
}

#[test]
fn boundary_notice_repeats_for_stamped_input() {
    let mut pb = started("intro-deck");
    pb.jump_to(2).unwrap();
    pb.drain_events();

    pb.handle_input_at(&key("ArrowRight"), 2_000);
    assert_eq!(position(&pb), (2, 0));
    assert_eq!(notices(&pb.drain_events()), vec![Notice::LastPage]);

    pb.handle_input_at(&key("ArrowRight"), 2_500);
    assert!(notices(&pb.drain_events()).is_empty());

    pb.handle_input_at(&key("ArrowRight"), 3_000);
    assert_eq!(notices(&pb.drain_events()), vec![Notice::LastPage]);
}

#[test]
fn wheel_direction_and_throttle() {
    let mut pb = started("plain-deck");
    assert_eq!(pb.handle_input(&wheel(120.0)), Some(Command::Advance));
    assert_eq!(pb.handle_input(&wheel(40.0)), None);
    assert_eq!(pb.handle_input(&wheel(0.0)), None);
    assert_eq!(position(&pb), (1, 0));

    assert_eq!(pb.handle_input(&wheel(-120.0)), Some(Command::Retreat));
    assert_eq!(position(&pb), (0, 0));

    pb.tick(499);
    assert_eq!(pb.handle_input(&wheel(-1.0)), None);
    pb.tick(1);
    assert_eq!(pb.handle_input(&wheel(-1.0)), Some(Command::Retreat));
}

/// it should page on vertical swipes only
#[test]
fn vertical_swipes_page() {
    let mut pb = started("plain-deck");
    let [start, end] = swipe((100.0, 400.0), (110.0, 200.0));
    assert_eq!(pb.handle_input(&start), None);
    assert_eq!(pb.handle_input(&end), Some(Command::Advance));
    assert_eq!(position(&pb), (1, 0));

    let [start, end] = swipe((100.0, 200.0), (100.0, 400.0));
    pb.handle_input(&start);
    assert_eq!(pb.handle_input(&end), Some(Command::Retreat));
    assert_eq!(position(&pb), (0, 0));
}

#[test]
fn short_or_horizontal_swipes_are_ignored() {
    let mut pb = started("plain-deck");
    let [start, end] = swipe((0.0, 0.0), (0.0, 40.0));
    pb.handle_input(&start);
    assert_eq!(pb.handle_input(&end), None);

    let [start, end] = swipe((0.0, 0.0), (300.0, 120.0));
    pb.handle_input(&start);
    assert_eq!(pb.handle_input(&end), None);
    assert_eq!(position(&pb), (0, 0));
}

#[test]
fn non_finite_swipe_distance_is_rejected_at_construction() {
    let cfg = PlaybackConfig {
        input: InputConfig {
            min_swipe_distance: f64::NAN,
            ..InputConfig::default()
        },
        ..PlaybackConfig::default()
    };
    let err = Playback::new(cfg, deck("plain-deck"), Recorder::default()).unwrap_err();
    assert!(matches!(err, PlaybackError::InvalidConfig { .. }));
}

#[test]
fn touch_end_without_a_start_never_pages() {
    let mut pb = started("plain-deck");
    assert_eq!(
        pb.handle_input(&InputEvent::TouchEnd { x: 0.0, y: 900.0 }),
        None
    );
}

#[test]
fn disabled_sources_register_no_listener() {
    let cfg = PlaybackConfig {
        input: InputConfig {
            wheel: false,
            ..InputConfig::default()
        },
        ..PlaybackConfig::default()
    };
    let mut pb = playback("plain-deck", cfg);
    pb.start();
    assert!(!pb.is_listening(InputSource::Wheel));
    assert!(pb.is_listening(InputSource::Keyboard));
    assert!(pb.is_listening(InputSource::Touch));
    assert_eq!(pb.handle_input(&wheel(100.0)), None);
    assert_eq!(position(&pb), (0, 0));
}

/// it should release every listener on stop
#[test]
fn input_is_ignored_while_unmounted() {
    let mut pb = playback("plain-deck", PlaybackConfig::default());
    assert!(!pb.is_listening(InputSource::Keyboard));
    assert_eq!(pb.handle_input(&key("ArrowDown")), None);

    pb.start();
    pb.stop();
    for source in [InputSource::Keyboard, InputSource::Wheel, InputSource::Touch] {
        assert!(!pb.is_listening(source));
    }
    assert_eq!(pb.handle_input(&key("ArrowDown")), None);
    assert_eq!(position(&pb), (0, 0));
}

#[test]
fn commands_are_reported_even_when_playback_is_busy() {
    let mut pb = started("intro-deck");
    assert_eq!(pb.handle_input(&key("ArrowRight")), Some(Command::Advance));
    assert!(pb.is_animating());
    pb.tick(300);
    assert_eq!(pb.handle_input(&key("ArrowRight")), Some(Command::Advance));
    assert_eq!(position(&pb), (0, 1));
}

#[test]
fn input_events_deserialize_from_host_json() {
    let events: Vec<InputEvent> = serde_json::from_str(
        r#"[
            { "type": "key", "key": "ArrowLeft" },
            { "type": "wheel", "delta_y": -3.5 },
            { "type": "touch_start", "x": 1, "y": 2 },
            { "type": "touch_end", "x": 1, "y": 90 }
        ]"#,
    )
    .unwrap();
    assert_eq!(events[0], key("ArrowLeft"));
    assert_eq!(events[1], wheel(-3.5));
    assert_eq!(events[3].source(), InputSource::Touch);
}
