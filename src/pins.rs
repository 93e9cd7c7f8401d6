//! GPIO / peripheral pin assignments for the ventilator board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Fan relay
// ---------------------------------------------------------------------------

/// Digital output driving the fan relay coil through a transistor.
pub const RELAY_GPIO: i32 = 3;
/// `true` if a HIGH level closes the relay contact.
pub const RELAY_ACTIVE_HIGH: bool = true;

// ---------------------------------------------------------------------------
// Humidity sensor (ADC1)
// ---------------------------------------------------------------------------

/// Analog humidity sensor output via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const HUMIDITY_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: short press cycles the mode, long press
/// returns to automatic.
pub const BUTTON_GPIO: i32 = 16;
