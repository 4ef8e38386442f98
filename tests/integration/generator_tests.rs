//! Integration tests for `Generator` — the application service.
//!
//! Exercises the FSM through the public poll API with mock adapters:
//! arm positions, overload, special modes, light flushing and tick
//! wraparound.

use super::mock_hw::{MockDelay, MockHardware, OutputCall, RecordingSink};
use naquadah::app::events::GeneratorEvent;
use naquadah::app::service::Generator;
use naquadah::config::GeneratorConfig;
use naquadah::fsm::modes::SpecialMode;
use naquadah::fsm::GeneratorState;
use naquadah::lights::{Level, Line};

/// No boot show and no charger key so output traffic is the FSM's alone.
fn quiet_config() -> GeneratorConfig {
    GeneratorConfig {
        run_startup_sequence: false,
        use_charger_key: false,
        ..GeneratorConfig::default()
    }
}

fn make_generator() -> (Generator, MockHardware, RecordingSink) {
    make_generator_at(0)
}

fn make_generator_at(now_ms: u32) -> (Generator, MockHardware, RecordingSink) {
    let mut generator = Generator::new(quiet_config());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    hw.now_ms = now_ms;
    generator.begin(&mut hw, &mut MockDelay::default(), &mut sink);
    (generator, hw, sink)
}

/// Poll once per millisecond for `count` polls, starting at the current
/// mock time.
fn poll_ms(generator: &mut Generator, hw: &mut MockHardware, sink: &mut RecordingSink, count: u32) {
    for _ in 0..count {
        generator.update(hw, sink);
        hw.now_ms = hw.now_ms.wrapping_add(1);
    }
}

/// Blue segments switched on, in order.
fn blue_steps(hw: &MockHardware) -> Vec<Line> {
    hw.calls
        .iter()
        .filter_map(|c| match c {
            OutputCall::Stage(line, Level::On) if line.is_blue() => Some(*line),
            _ => None,
        })
        .collect()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boots_into_off_with_ready_lit() {
    let (generator, hw, sink) = make_generator();

    assert_eq!(generator.state(), GeneratorState::Off);
    assert_eq!(generator.special_mode(), Some(SpecialMode::Off));
    assert!(hw.is_lit(Line::Ready), "READY must be on in OFF");
    assert_eq!(hw.lights().lit_blue().count(), 0);
    assert_eq!(hw.flushes(), 1, "OFF entry is one transfer");
    assert_eq!(sink.events, vec![GeneratorEvent::Started(GeneratorState::Off)]);
}

// ── Position sensing ──────────────────────────────────────────

#[test]
fn first_active_sensor_wins() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.low_sensors = vec![GeneratorState::On, GeneratorState::Primed0];
    assert_eq!(generator.poll_state(&mut hw), GeneratorState::Primed0);

    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Primed0);
}

#[test]
fn no_active_sensor_keeps_state() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed1);
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Primed1);

    hw.release_all();
    hw.clear_calls();
    poll_ms(&mut generator, &mut hw, &mut sink, 50);

    assert_eq!(generator.state(), GeneratorState::Primed1);
    assert_eq!(generator.poll_state(&mut hw), GeneratorState::Primed1);
    assert!(hw.calls.is_empty(), "arm in transit must not touch outputs");
}

#[test]
fn poll_state_does_not_transition() {
    let (generator, mut hw, _sink) = make_generator();

    hw.hold(GeneratorState::On);
    assert_eq!(generator.poll_state(&mut hw), GeneratorState::On);
    assert_eq!(generator.state(), GeneratorState::Off);
    assert_eq!(hw.flushes(), 1);
}

#[test]
fn state_changes_are_reported() {
    let (mut generator, mut hw, mut sink) = make_generator();

    for state in [
        GeneratorState::Primed0,
        GeneratorState::Primed1,
        GeneratorState::On,
        GeneratorState::Off,
    ] {
        hw.hold(state);
        generator.update(&mut hw, &mut sink);
    }

    assert_eq!(
        sink.state_changes(),
        vec![
            (GeneratorState::Off, GeneratorState::Primed0),
            (GeneratorState::Primed0, GeneratorState::Primed1),
            (GeneratorState::Primed1, GeneratorState::On),
            (GeneratorState::On, GeneratorState::Off),
        ]
    );
}

// ── Lights per state ──────────────────────────────────────────

#[test]
fn primed_states_light_green_then_red() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed0);
    generator.update(&mut hw, &mut sink);
    assert!(hw.is_lit(Line::Green));
    assert!(hw.is_lit(Line::Ready));
    assert!(!hw.is_lit(Line::Red));

    hw.hold(GeneratorState::Primed1);
    generator.update(&mut hw, &mut sink);
    assert!(!hw.is_lit(Line::Green));
    assert!(hw.is_lit(Line::Red));
}

#[test]
fn on_lights_red_white_and_first_blue() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    generator.update(&mut hw, &mut sink);

    assert_eq!(generator.state(), GeneratorState::On);
    assert!(hw.is_lit(Line::Red));
    assert!(hw.is_lit(Line::White));
    assert!(!hw.is_lit(Line::Green));
    assert_eq!(hw.lights().lit_blue().collect::<Vec<_>>(), vec![Line::Blue1]);
    assert_eq!(generator.light_delay_ms(), 130);
}

#[test]
fn primed1_to_on_never_drops_red() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed1);
    generator.update(&mut hw, &mut sink);
    hw.clear_calls();

    hw.hold(GeneratorState::On);
    generator.update(&mut hw, &mut sink);

    assert!(
        hw.staged_levels(Line::Red).is_empty(),
        "red is already on and must not be rewritten"
    );
    assert!(hw.is_lit(Line::Red));
}

#[test]
fn leaving_on_clears_blue_in_one_transfer() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    poll_ms(&mut generator, &mut hw, &mut sink, 300);
    hw.clear_calls();

    hw.hold(GeneratorState::Primed1);
    generator.update(&mut hw, &mut sink);

    assert_eq!(hw.flushes(), 1);
    assert_eq!(hw.lights().lit_blue().count(), 0);
    assert!(!hw.is_lit(Line::White));
    assert!(hw.is_lit(Line::Red));
}

#[test]
fn steady_state_sends_nothing() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed0);
    generator.update(&mut hw, &mut sink);
    hw.clear_calls();

    poll_ms(&mut generator, &mut hw, &mut sink, 1_000);
    assert!(hw.calls.is_empty(), "unchanged frame must not be re-sent");
}

// ── Blue scroll ───────────────────────────────────────────────

#[test]
fn seven_hundred_ms_of_on_wraps_back_to_first_blue() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    poll_ms(&mut generator, &mut hw, &mut sink, 700);

    // Entry lights Blue1, then steps at 130, 260, 390, 520 and 650.
    assert_eq!(
        blue_steps(&hw),
        vec![Line::Blue1, Line::Blue2, Line::Blue3, Line::Blue4, Line::Blue5, Line::Blue1]
    );
    assert_eq!(generator.current_blue(), Line::Blue1);
    assert_eq!(hw.lights().lit_blue().count(), 1, "exactly one blue lit");
}

#[test]
fn scroll_survives_tick_wraparound() {
    let (mut generator, mut hw, mut sink) = make_generator_at(u32::MAX - 300);

    hw.hold(GeneratorState::On);
    poll_ms(&mut generator, &mut hw, &mut sink, 700);

    assert!(hw.now_ms < 1_000, "clock should have wrapped");
    assert_eq!(blue_steps(&hw).len(), 6);
    assert_eq!(generator.current_blue(), Line::Blue1);
}

#[test]
fn reentering_on_restarts_scroll_at_first_blue() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    poll_ms(&mut generator, &mut hw, &mut sink, 300);
    assert_eq!(generator.current_blue(), Line::Blue3);

    hw.hold(GeneratorState::Primed1);
    generator.update(&mut hw, &mut sink);
    hw.hold(GeneratorState::On);
    generator.update(&mut hw, &mut sink);

    assert_eq!(generator.current_blue(), Line::Blue1);
}

// ── Overload ──────────────────────────────────────────────────

#[test]
fn overload_speeds_up_scroll_without_restarting_it() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    poll_ms(&mut generator, &mut hw, &mut sink, 200);
    assert_eq!(generator.current_blue(), Line::Blue2);
    hw.clear_calls();

    hw.overload = true;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Overload);
    assert_eq!(generator.light_delay_ms(), 65);
    assert!(hw.calls.is_empty(), "entering overload from ON changes no light");

    // Pending step (armed at 130) still fires at 260, then every 65 ms.
    hw.now_ms = 201;
    poll_ms(&mut generator, &mut hw, &mut sink, 190);
    assert_eq!(blue_steps(&hw), vec![Line::Blue3, Line::Blue4, Line::Blue5]);
}

#[test]
fn releasing_overload_returns_to_standard_speed() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::On);
    hw.overload = true;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Overload);
    assert_eq!(generator.light_delay_ms(), 65);
    assert!(hw.is_lit(Line::Red) && hw.is_lit(Line::White));

    hw.overload = false;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::On);
    assert_eq!(generator.light_delay_ms(), 130);
}

#[test]
fn overload_ignored_outside_on_position() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed1);
    hw.overload = true;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Primed1);
}

#[test]
fn overload_input_can_be_disabled() {
    let mut generator = Generator::new(GeneratorConfig {
        overload_input_enabled: false,
        ..quiet_config()
    });
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    generator.begin(&mut hw, &mut MockDelay::default(), &mut sink);

    hw.hold(GeneratorState::On);
    hw.overload = true;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::On);
}

// ── Special modes ─────────────────────────────────────────────

#[test]
fn mode02_round_trip_through_on() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.mode_value = 2;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.special_mode(), Some(SpecialMode::Mode02));
    assert!(hw.is_lit(Line::Green) && hw.is_lit(Line::Red));

    let resets = hw.mode_resets;
    hw.hold(GeneratorState::On);
    generator.update(&mut hw, &mut sink);
    assert_eq!(hw.mode_resets, resets + 1, "ON resets the mode button");
    assert_eq!(hw.mode_value, 0);

    hw.hold(GeneratorState::Off);
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Off);
    assert_eq!(generator.special_mode(), Some(SpecialMode::Off));
    assert!(hw.is_lit(Line::Ready));
    assert!(!hw.is_lit(Line::Green) && !hw.is_lit(Line::Red));

    assert!(sink.events.contains(&GeneratorEvent::SpecialModeChanged { from: 0, to: 2 }));
    assert!(sink.events.contains(&GeneratorEvent::SpecialModeChanged { from: 2, to: 0 }));
}

#[test]
fn mode01_plays_ramp_then_lights_ready() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.mode_value = 1;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.special_mode(), Some(SpecialMode::Mode01));
    assert!(!hw.is_lit(Line::Ready), "READY is dark while the show runs");

    // Ramp steps every 195 ms, not at the 130 ms scroll pace.
    hw.now_ms = 1;
    poll_ms(&mut generator, &mut hw, &mut sink, 193);
    assert!(!hw.is_lit(Line::Blue1), "first blue must wait a full ramp step");
    poll_ms(&mut generator, &mut hw, &mut sink, 2);
    assert!(hw.is_lit(Line::Blue1));

    poll_ms(&mut generator, &mut hw, &mut sink, 3_000);

    for line in Line::LIGHTS {
        assert!(hw.is_lit(line), "{} should be lit after the ramp", line.name());
    }
}

#[test]
fn undefined_modes_only_reset_lights() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.mode_value = 4;
    generator.update(&mut hw, &mut sink);
    assert_eq!(generator.special_mode(), Some(SpecialMode::Mode04));
    assert_eq!(generator.state(), GeneratorState::Off);
    assert!(hw.is_lit(Line::Ready));
    assert_eq!(hw.lights().lit_blue().count(), 0);
}

#[test]
fn mode_button_ignored_outside_off() {
    let (mut generator, mut hw, mut sink) = make_generator();

    hw.hold(GeneratorState::Primed0);
    generator.update(&mut hw, &mut sink);
    hw.clear_calls();

    hw.mode_value = 2;
    poll_ms(&mut generator, &mut hw, &mut sink, 10);
    assert!(hw.calls.is_empty());
    assert_eq!(generator.special_mode(), Some(SpecialMode::Off));
}

// ── apply_state ───────────────────────────────────────────────

#[test]
fn apply_state_runs_entry_effects_once() {
    let (mut generator, mut hw, mut sink) = make_generator();

    generator.apply_state(GeneratorState::Primed0, &mut hw, &mut sink);
    assert_eq!(generator.state(), GeneratorState::Primed0);
    assert!(hw.is_lit(Line::Green));
    hw.clear_calls();

    generator.apply_state(GeneratorState::Primed0, &mut hw, &mut sink);
    assert!(hw.calls.is_empty(), "applying the current state is a no-op");
    assert_eq!(sink.state_changes().len(), 1);
}
