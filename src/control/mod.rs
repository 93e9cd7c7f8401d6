//! Control decision engine.
//!
//! [`timed_value`] provides the age-aware value cell; [`fan_control`] holds
//! the mode/relay state machine and the evaluation algorithm.  Nothing in
//! here performs I/O other than the single relay write per evaluation.

pub mod fan_control;
pub mod timed_value;

pub use fan_control::{ControlStatus, FanControl, HumidityBand, Mode};
pub use timed_value::TimedValue;
