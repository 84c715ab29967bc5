//! Adapters — concrete implementations of the hexagonal port traits and
//! the outer surfaces of the process.
//!
//! | Adapter      | Implements / provides | Connects to              |
//! |--------------|-----------------------|--------------------------|
//! | `file_store` | ConfigPort            | JSON settings file       |
//! | `log_sink`   | EventSink             | `log` facade             |
//! | `logging`    | logger backend        | log file + console       |
//! | `http`       | status interface      | TCP listener (axum)      |
//!
//! Sensor adapters live in [`crate::sensors`].

pub mod file_store;
pub mod http;
pub mod log_sink;
pub mod logging;
