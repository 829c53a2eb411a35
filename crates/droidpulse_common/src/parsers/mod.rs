//! Deterministic parsers for device command output.
//!
//! One module per source format (battery dump, df, meminfo, cpuinfo, wifi,
//! package list, logcat, ping). Each pattern lives behind a named function
//! with its own tests fed literal captured sample text, so a format change
//! on a future Android release fails loudly in exactly one place.

pub mod apps;
pub mod battery;
pub mod cpu;
pub mod logcat;
pub mod memory;
pub mod network;
pub mod ping;
pub mod storage;
pub mod wifi_detail;

use regex::Regex;

/// Top-consumer lists stop accepting entries at this cap, preserving
/// source order.
pub const MAX_TOP_CONSUMERS: usize = 10;

/// First capture group of `pattern` in `text`, trimmed.
pub(crate) fn capture(text: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub(crate) fn capture_i64(text: &str, pattern: &str) -> Option<i64> {
    capture(text, pattern)?.parse().ok()
}

pub(crate) fn capture_u64(text: &str, pattern: &str) -> Option<u64> {
    capture(text, pattern)?.parse().ok()
}

pub(crate) fn capture_f64(text: &str, pattern: &str) -> Option<f64> {
    capture(text, pattern)?.parse().ok()
}

/// Case-insensitive "true"/"false"; anything else is not a boolean.
pub(crate) fn capture_bool(text: &str, pattern: &str) -> Option<bool> {
    match capture(text, pattern)?.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
