//! Integration tests for the peripherals that run beside the FSM: the
//! charger key relay, the battery meter and the blocking startup show.

use super::mock_hw::{MockDelay, MockHardware, RecordingSink};
use naquadah::app::events::GeneratorEvent;
use naquadah::app::service::Generator;
use naquadah::config::GeneratorConfig;
use naquadah::fsm::GeneratorState;
use naquadah::lights::{Line, LightFrame};

fn boot(config: GeneratorConfig) -> (Generator, MockHardware, RecordingSink, MockDelay) {
    let mut generator = Generator::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut delay = MockDelay::default();
    generator.begin(&mut hw, &mut delay, &mut sink);
    (generator, hw, sink, delay)
}

fn charger_only() -> GeneratorConfig {
    GeneratorConfig {
        run_startup_sequence: false,
        ..GeneratorConfig::default()
    }
}

fn meter_only() -> GeneratorConfig {
    GeneratorConfig {
        run_startup_sequence: false,
        use_charger_key: false,
        ..GeneratorConfig::default()
    }
}

// ── Charger key ───────────────────────────────────────────────

#[test]
fn charger_key_released_at_boot() {
    let (generator, hw, _sink, _delay) = boot(charger_only());

    assert!(!hw.charger_pressed());
    assert!(!generator.charger_key_active());
}

#[test]
fn charger_key_alternates_pulse_and_idle() {
    let (mut generator, mut hw, mut sink, _delay) = boot(charger_only());

    let mut flips = Vec::new();
    let mut last = hw.charger_pressed();
    for t in (0..=25_000u32).step_by(10) {
        hw.now_ms = t;
        generator.update(&mut hw, &mut sink);
        if hw.charger_pressed() != last {
            last = hw.charger_pressed();
            flips.push((t, last));
        }
    }

    assert_eq!(
        flips,
        vec![
            (400, true),
            (800, false),
            (10_800, true),
            (11_200, false),
            (21_200, true),
            (21_600, false),
        ]
    );

    let reported: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            GeneratorEvent::ChargerKey { pressed } => Some(*pressed),
            _ => None,
        })
        .collect();
    assert_eq!(reported, vec![true, false, true, false, true, false]);
}

#[test]
fn charger_key_runs_in_every_state() {
    let (mut generator, mut hw, mut sink, _delay) = boot(charger_only());

    hw.hold(GeneratorState::On);
    for t in (0..=500u32).step_by(5) {
        hw.now_ms = t;
        generator.update(&mut hw, &mut sink);
    }

    assert_eq!(generator.state(), GeneratorState::On);
    assert!(generator.charger_key_active(), "pressed at 400, released at 800");
    assert!(hw.is_lit(Line::White), "relay pulse leaves the lights alone");
}

#[test]
fn disabled_charger_key_never_touches_relay() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    for t in (0..=30_000u32).step_by(100) {
        hw.now_ms = t;
        generator.update(&mut hw, &mut sink);
    }

    assert!(hw.staged_levels(Line::ChargerKey).is_empty());
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, GeneratorEvent::ChargerKey { .. })));
}

// ── Battery meter ─────────────────────────────────────────────

#[test]
fn meter_shows_level_while_held() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    hw.meter_pressed = true;
    hw.battery_raw = 865;
    generator.update(&mut hw, &mut sink);

    assert!(generator.battery_meter_showing());
    assert_eq!(hw.lights().lit_blue().count(), 5);
    assert!(sink
        .events
        .contains(&GeneratorEvent::BatteryLevel { raw: 865, level: 5 }));
}

#[test]
fn meter_refreshes_on_its_period() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    hw.meter_pressed = true;
    hw.battery_raw = 865;
    generator.update(&mut hw, &mut sink);
    assert_eq!(hw.battery_reads, 1);

    // Falls to 700 (two segments) but the display holds until 500 ms.
    hw.battery_raw = 700;
    hw.now_ms = 499;
    generator.update(&mut hw, &mut sink);
    assert_eq!(hw.battery_reads, 1);
    assert_eq!(hw.lights().lit_blue().count(), 5);

    hw.now_ms = 500;
    generator.update(&mut hw, &mut sink);
    assert_eq!(hw.battery_reads, 2);
    assert_eq!(
        hw.lights().lit_blue().collect::<Vec<_>>(),
        vec![Line::Blue1, Line::Blue2]
    );
}

#[test]
fn meter_clears_on_release() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    hw.meter_pressed = true;
    hw.battery_raw = 800;
    generator.update(&mut hw, &mut sink);
    assert!(hw.lights().lit_blue().count() > 0);

    hw.meter_pressed = false;
    hw.now_ms = 10;
    generator.update(&mut hw, &mut sink);
    assert!(!generator.battery_meter_showing());
    assert_eq!(hw.lights().lit_blue().count(), 0);
    assert!(hw.is_lit(Line::Ready));
}

#[test]
fn meter_only_runs_in_off_without_a_mode() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    hw.mode_value = 2;
    generator.update(&mut hw, &mut sink);
    hw.meter_pressed = true;
    hw.battery_raw = 865;
    for t in 1..20 {
        hw.now_ms = t;
        generator.update(&mut hw, &mut sink);
    }
    assert_eq!(hw.battery_reads, 0, "MODE02 owns the display");

    hw.mode_value = 0;
    hw.hold(GeneratorState::Primed0);
    generator.update(&mut hw, &mut sink);
    assert_eq!(hw.battery_reads, 0, "meter is an OFF-only feature");
}

#[test]
fn leaving_off_drops_meter_display() {
    let (mut generator, mut hw, mut sink, _delay) = boot(meter_only());

    hw.meter_pressed = true;
    hw.battery_raw = 865;
    generator.update(&mut hw, &mut sink);
    assert!(generator.battery_meter_showing());

    hw.hold(GeneratorState::Primed0);
    generator.update(&mut hw, &mut sink);
    assert!(!generator.battery_meter_showing());
    assert_eq!(hw.lights().lit_blue().count(), 0);
}

// ── Startup show ──────────────────────────────────────────────

#[test]
fn startup_show_blocks_for_its_full_length() {
    let (generator, hw, _sink, delay) = boot(GeneratorConfig {
        use_charger_key: false,
        ..GeneratorConfig::default()
    });

    // 5 blue + 2 double pauses up, 12-step hold, double pause, pause + 5 blue down.
    assert_eq!(delay.total_ms(), 195 * 29);
    assert_eq!(delay.calls, 14);
    // One transfer per step, then the OFF entry.
    assert_eq!(hw.flushes(), 15);
    assert_eq!(generator.state(), GeneratorState::Off);
    assert!(hw.is_lit(Line::Ready));
}

#[test]
fn startup_show_lights_everything_but_ready_at_its_peak() {
    let (_gen, hw, _sink, _delay) = boot(GeneratorConfig {
        use_charger_key: false,
        ..GeneratorConfig::default()
    });

    let peak = LightFrame::from_bits(hw.frames[6]);
    for line in Line::LIGHTS {
        assert_eq!(peak.is_on(line), line != Line::Ready, "{}", line.name());
    }
    let ramped_down = LightFrame::from_bits(hw.frames[13]);
    assert_eq!(ramped_down, LightFrame::DARK);
}

#[test]
fn startup_show_can_be_skipped() {
    let (_gen, hw, _sink, delay) = boot(meter_only());

    assert_eq!(delay.calls, 0);
    assert_eq!(hw.flushes(), 1);
}
