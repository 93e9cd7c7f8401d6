//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | HumiditySensorPort | ESP32 ADC                |
//! |            | RelayPort          | relay GPIO (OutputPin)   |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `nvs`      | ConfigPort         | NVS / in-memory store    |
//! | `time`     | TimePort           | ESP32 system timer       |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
