//! Sensor subsystem.
//!
//! The ventilator has a single analog humidity sensor; the
//! [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter) turns its
//! samples into the plain `Option<f32>` the domain consumes.

pub mod humidity;
