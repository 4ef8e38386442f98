//! Naquadah Generator Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter              LogEventSink    Esp32TimeAdapter │
//! │  (Sensor+Output+Control+      (EventSink)     (Clock+DelayNs)  │
//! │   Battery+Clock)                                               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Generator (pure logic)                    │    │
//! │  │  FSM · battery meter · charger key · light frame       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use naquadah::adapters::hardware::HardwareAdapter;
use naquadah::adapters::log_sink::LogEventSink;
use naquadah::adapters::time::Esp32TimeAdapter;
use naquadah::app::service::Generator;
use naquadah::config::GeneratorConfig;
use naquadah::drivers::hw_init;

use embedded_hal::delay::DelayNs;

/// Board profile baked into the image.
const BOARD_PROFILE: &str = include_str!("../config/generator.json");

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Naquadah Generator v{}             ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Board profile (or defaults) ────────────────────────
    let config = match GeneratorConfig::from_json(BOARD_PROFILE) {
        Ok(cfg) => {
            info!("Board profile loaded");
            cfg
        }
        Err(e) => {
            warn!("Board profile rejected ({}), using defaults", e);
            GeneratorConfig::default()
        }
    };
    log::set_max_level(config.debug_level.level_filter());

    // ── 3. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals()?;

    // ── 4. Construct adapters ─────────────────────────────────
    let mut delay = Esp32TimeAdapter::new();
    let mut hw = HardwareAdapter::new(&config, Esp32TimeAdapter::new());
    let mut log_sink = LogEventSink::new();

    // ── 5. Generator: startup show, then OFF ──────────────────
    let poll_ms = config.poll_interval_ms;
    let mut generator = Generator::new(config);
    generator.begin(&mut hw, &mut delay, &mut log_sink);

    info!("System ready. Polling every {} ms.", poll_ms);

    // ── 6. Poll loop ──────────────────────────────────────────
    loop {
        generator.update(&mut hw, &mut log_sink);
        // Yields to FreeRTOS so the idle task can feed the watchdog.
        delay.delay_ms(poll_ms);
    }
}
