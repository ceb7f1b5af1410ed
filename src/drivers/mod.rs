//! Actuator drivers and peripheral helpers.

pub mod hw_init;
pub mod relay;
