//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the orchestration of the generator: input
//! snapshots, FSM ticks, light flushing, the battery meter and the charger
//! key.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without real
//! peripherals.

pub mod events;
pub mod ports;
pub mod service;
