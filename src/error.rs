//! Error types for strip configuration and rendering.

use thiserror::Error;

/// Errors raised by strip setup and the coloring operations.
///
/// Every error is a synchronous failure of the invoking call. Nothing is
/// retried internally, and validation always happens before transmission,
/// so a failed call never partially updates the strip.
#[derive(Debug, Error)]
pub enum StripError {
    /// A coloring operation was called before `setup`.
    #[error("the LED strip is not set up; call setup() first")]
    NotInitialized,

    /// `setup` was called on an already-configured controller.
    #[error("the LED strip is already set up")]
    AlreadyConfigured,

    /// The hardware profile also selects the single status LED, which is
    /// mutually exclusive with the strip.
    #[error("cannot drive both a status LED and an LED strip; select only one")]
    ConflictingPeripheral,

    /// The hardware profile does not select the LED strip at all.
    #[error("the hardware profile does not include an LED strip")]
    StripNotSelected,

    /// A buffer's length does not match the configured pixel count.
    #[error("expected a buffer of {expected} colors, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A single-LED index beyond the end of the strip.
    #[error("cannot shine LED at index {index} when the strip only has {count} LEDs")]
    IndexOutOfRange { index: usize, count: usize },

    /// A color string that is neither a known name nor a hex literal.
    #[error("unrecognized color {0:?}")]
    InvalidColor(String),

    /// A failure reported by the strip hardware driver.
    #[error("strip driver error: {0}")]
    Driver(String),
}
