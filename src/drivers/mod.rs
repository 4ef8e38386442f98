//! Output drivers, input drivers, light shows and hardware initialisation.

pub mod battery_meter;
pub mod button;
pub mod charger_key;
pub mod hw_init;
pub mod light_show;
pub mod shift_register;
