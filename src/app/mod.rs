//! Application core: pure domain logic, zero I/O.
//!
//! This module wires the control engine to the outside world: it owns the
//! [`FanControl`](crate::control::FanControl) state machine and the
//! trigger [`Scheduler`](crate::scheduler::Scheduler), and talks to
//! hardware only through the **port traits** defined in [`ports`].

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
