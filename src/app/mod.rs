//! Application core — pure domain logic, zero I/O.
//!
//! This module holds the station's business rules: the per-cycle
//! orchestration, remote-command handling and dashboard synchronisation.
//! All interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod commands;
pub mod events;
pub mod mailbox;
pub mod ports;
pub mod service;
