//! Process-wide progress logger shim.
//!
//! Lets any part of the pipeline emit a progress message through an
//! optionally-installed callback, falling back to stdout when none is set.
//! This is user-facing progress output, separate from `tracing` diagnostics.
//!
//! The slot is single-writer-last-wins: `set_logger` overwrites any previous
//! callback. Install the callback once at startup; the mutex only makes the
//! overwrite itself safe, not concurrent reconfiguration.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Callback receiving the raw message text.
pub type LogCallback = dyn Fn(&str) + Send + Sync;

static LOGGER: Lazy<Mutex<Option<Arc<LogCallback>>>> = Lazy::new(|| Mutex::new(None));

/// Install the process-wide logger callback, replacing any previous one.
pub fn set_logger(callback: Arc<LogCallback>) {
    *LOGGER.lock() = Some(callback);
}

/// Remove the installed callback, restoring stdout output.
pub fn clear_logger() {
    *LOGGER.lock() = None;
}

/// Return the currently installed callback, if any.
pub fn logger() -> Option<Arc<LogCallback>> {
    LOGGER.lock().clone()
}

/// Emit a message through the installed callback, or print it to stdout.
///
/// A panicking callback is not caught here; the failure propagates to the
/// caller.
pub fn log(message: &str) {
    match logger() {
        Some(callback) => callback(message),
        None => println!("{message}"),
    }
}
