//! Platform abstraction layer
//!
//! Handles browser/native differences for wall-clock time. Everything that
//! needs "now" takes it as an argument; only the entry point calls in here.

/// Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Run seed derived from the clock
pub fn clock_seed() -> u64 {
    now_ms() as u64
}
