//! Library for controlling WS281x RGB LED strips on Raspberry Pi, plus
//! the modules used by the main binary (HTTP API server).
//!
//! The core is hardware-independent and testable anywhere:
//! - [`color`] — the [`Color`] type, HSL→RGB conversion, 24-bit packing,
//!   and color-string parsing
//! - [`pattern`] — full-strip color sequences (rainbow with phase offset)
//! - [`strip`] — the [`StripBuffer`] render unit and the
//!   [`StripController`] that validates and transmits it
//! - [`driver`] — the [`StripDriver`] seam; the real WS281x driver
//!   builds only with the `hardware` feature
//!
//! The `render` and `server` modules carry the daemon: a render thread
//! that owns the hardware and an axum HTTP API in front of it.

pub mod color;
pub mod driver;
pub mod error;
pub mod pattern;
pub mod render;
#[cfg(feature = "hardware")]
pub mod server;
pub mod strip;

pub use color::Color;
#[cfg(feature = "hardware")]
pub use driver::Ws281xDriver;
pub use driver::StripDriver;
pub use error::StripError;
pub use strip::{HardwareProfile, StripBuffer, StripConfig, StripController};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Signal handling ────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// Demo loops poll the flag and exit cleanly, dropping their controller,
/// which blanks the strip.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");

    running
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}
