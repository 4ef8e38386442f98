//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                      |
//! |------------|---------------|----------------------------------|
//! | `hardware` | SensorPort    | Hall-effect position sensors     |
//! |            | OutputPort    | 74HC595 shift-register chain     |
//! |            | ControlPort   | Mode and meter buttons           |
//! |            | BatteryPort   | ESP32 ADC1                       |
//! |            | ClockPort     | via `time`                       |
//! | `log_sink` | EventSink     | Serial log output                |
//! | `time`     | ClockPort     | ESP32 system timer               |
//! |            | DelayNs       | FreeRTOS task delay              |

pub mod hardware;
pub mod log_sink;
pub mod time;
