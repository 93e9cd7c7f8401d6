//! ISR-debounced mode button with short and long press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up. GPIO fires on
//! falling edge; ISR records the raw timestamp into an atomic, and the
//! `tick()` method (called from the main loop at loop-tick rate)
//! runs the debounce + gesture state machine.
//!
//! ## Gesture mapping
//!
//! | Gesture     | Condition         | Command              |
//! |-------------|-------------------|----------------------|
//! | Short press | Release < 3s      | `CycleMode`          |
//! | Long press  | Hold >= 3s        | `SetMode(Auto)`      |

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::commands::AppCommand;
use crate::control::Mode;

const DEBOUNCE_MS: u32 = 50;
const LONG_PRESS_MS: u32 = 3000;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the main loop.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
static SIM_BUTTON_HELD: core::sync::atomic::AtomicBool = core::sync::atomic::AtomicBool::new(false);

/// Hold or release the simulated button (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_button_held(held: bool) {
    SIM_BUTTON_HELD.store(held, Ordering::Relaxed);
}

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
}

impl ButtonEvent {
    pub fn command(self) -> AppCommand {
        match self {
            Self::ShortPress => AppCommand::CycleMode,
            Self::LongPress => AppCommand::SetMode(Mode::Auto),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Pressed { since_ms: u32 },
    /// Long press already reported; wait for release before re-arming.
    Held,
}

pub struct ButtonDriver {
    gpio: i32,
    state: GestureState,
    last_isr_ms: u32,
}

impl ButtonDriver {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            state: GestureState::Idle,
            last_isr_ms: 0,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Call from the main loop at each loop tick.
    /// `now_ms` is the current monotonic time in milliseconds.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        let new_press = isr_ms != self.last_isr_ms && isr_ms != 0;

        match self.state {
            GestureState::Idle => {
                if new_press {
                    self.last_isr_ms = isr_ms;
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                None
            }

            GestureState::DebounceWait { since_ms } => {
                if now_ms.wrapping_sub(since_ms) < DEBOUNCE_MS {
                    return None;
                }
                // Bounce or glitch: the line is already released.
                self.state = if Self::is_pressed_hw() {
                    GestureState::Pressed { since_ms }
                } else {
                    GestureState::Idle
                };
                None
            }

            GestureState::Pressed { since_ms } => {
                if !Self::is_pressed_hw() {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::ShortPress);
                }
                if now_ms.wrapping_sub(since_ms) >= LONG_PRESS_MS {
                    self.state = GestureState::Held;
                    return Some(ButtonEvent::LongPress);
                }
                None
            }

            GestureState::Held => {
                if !Self::is_pressed_hw() {
                    self.state = GestureState::Idle;
                    // Edges seen while held belong to this press.
                    self.last_isr_ms = isr_ms;
                }
                None
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn is_pressed_hw() -> bool {
        !crate::drivers::hw_init::gpio_read(crate::pins::BUTTON_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_pressed_hw() -> bool {
        SIM_BUTTON_HELD.load(Ordering::Relaxed)
    }
}

/// ISR handler: register this on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
#[allow(unused)]
pub fn button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
