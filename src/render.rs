//! Render thread: owns the LED strip and processes commands via a channel.
//!
//! The WS281x DMA hardware is owned by a single dedicated thread. The
//! async HTTP server communicates with it by sending [`StripCommand`]
//! values through an `mpsc` channel; a command either renders
//! synchronously or fails, and failures are logged without stopping the
//! loop. When the channel closes the thread drops its controller, which
//! blanks the strip.

use crate::color::Color;
use serde::Serialize;

// ── Commands ─────────────────────────────────────────────────────────

/// Commands sent from the HTTP server to the render thread.
///
/// Color strings arrive pre-validated by the handlers; a command that
/// still fails to parse here is logged and skipped.
pub enum StripCommand {
    /// Shine the whole strip to one color (name or hex string).
    Solid(String),
    /// Shine the whole strip to one HSL color.
    Hsl { h: f64, s: f64, l: f64 },
    /// Shine a single LED, all others off.
    Led { index: usize, color: String },
    /// Shine a rainbow rotated left by `offset` pixels.
    Rainbow { offset: usize },
    /// Render a raw RGB frame (`num_leds * 3` bytes).
    Frame(Vec<u8>),
    /// Turn every pixel off.
    Clear,
}

// ── Status ───────────────────────────────────────────────────────────

/// What the strip is currently showing.
#[derive(Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StripState {
    Off,
    Solid,
    SingleLed,
    Rainbow,
    Streaming,
}

/// Shared status that the HTTP server reads to report current state.
/// The render thread writes it behind an `Arc<Mutex<_>>`.
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct StripStatus {
    /// Current strip state
    pub state: StripState,
    /// Hex form of the current solid or single-LED color (if any)
    pub color: Option<String>,
    /// Number of LEDs on the strip
    pub num_leds: u32,
    /// Server version
    pub version: String,
}

impl StripStatus {
    pub fn new(num_leds: u32) -> Self {
        Self {
            state: StripState::Off,
            color: None,
            num_leds,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn set_off(&mut self) {
        self.state = StripState::Off;
        self.color = None;
    }
}

/// Hex form of a color string, for status reporting. Returns `None` for
/// strings [`Color::parse`] cannot resolve.
pub fn status_hex(color: &str) -> Option<String> {
    Color::parse(color).ok().map(|c| c.to_hex())
}

// ── Render loop ──────────────────────────────────────────────────────

/// Main render loop — runs on a dedicated thread, owns the LED strip.
///
/// Initializes the driver and controller, then executes commands until
/// the channel closes (sender dropped), updating shared status along the
/// way. Returning drops the controller, which resets the strip to blank.
#[cfg(feature = "hardware")]
pub fn render_loop(
    rx: std::sync::mpsc::Receiver<StripCommand>,
    status: std::sync::Arc<std::sync::Mutex<StripStatus>>,
    config: crate::strip::StripConfig,
    pin: i32,
    dma: i32,
) {
    use crate::driver::Ws281xDriver;
    use crate::strip::{StripBuffer, StripController};

    let driver = Ws281xDriver::new(pin, dma);
    let mut controller = StripController::new(driver);
    if let Err(e) = controller.setup(config) {
        tracing::error!("Failed to initialize LED strip: {}", e);
        return;
    }

    tracing::info!("Render thread started, waiting for commands...");

    while let Ok(cmd) = rx.recv() {
        match cmd {
            StripCommand::Solid(color) => match controller.shine_strip_with_color(&color) {
                Ok(()) => {
                    let mut s = status.lock().unwrap();
                    s.state = StripState::Solid;
                    s.color = status_hex(&color);
                    tracing::info!("Strip shining {}", color);
                }
                Err(e) => tracing::error!("Failed to shine strip {}: {}", color, e),
            },

            StripCommand::Hsl { h, s, l } => match controller.shine_strip_with_hsl(h, s, l) {
                Ok(()) => {
                    let hex = Color::from_hsl(h, s, l).to_hex();
                    let mut st = status.lock().unwrap();
                    st.state = StripState::Solid;
                    st.color = Some(hex);
                }
                Err(e) => tracing::error!("Failed to shine HSL color: {}", e),
            },

            StripCommand::Led { index, color } => match controller.shine_led(index, &color) {
                Ok(()) => {
                    let mut s = status.lock().unwrap();
                    s.state = StripState::SingleLed;
                    s.color = status_hex(&color);
                }
                Err(e) => tracing::error!("Failed to shine LED {}: {}", index, e),
            },

            StripCommand::Rainbow { offset } => match controller.rainbow_strip(offset) {
                Ok(()) => {
                    let mut s = status.lock().unwrap();
                    s.state = StripState::Rainbow;
                    s.color = None;
                    tracing::info!("Strip shining rainbow (offset {})", offset);
                }
                Err(e) => tracing::error!("Failed to shine rainbow: {}", e),
            },

            StripCommand::Frame(data) => {
                let buffer = StripBuffer::from_rgb_bytes(&data);
                if let Err(e) = controller.shine_strip(buffer) {
                    tracing::error!("Failed to render frame: {}", e);
                }
            }

            StripCommand::Clear => match controller.clear() {
                Ok(()) => status.lock().unwrap().set_off(),
                Err(e) => tracing::error!("Failed to clear strip: {}", e),
            },
        }
    }

    tracing::info!("Render thread: channel closed, shutting down.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_starts_off_with_no_color() {
        let status = StripStatus::new(60);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "off");
        assert_eq!(json["color"], serde_json::Value::Null);
        assert_eq!(json["num_leds"], 60);
    }

    #[test]
    fn state_serializes_snake_case() {
        let mut status = StripStatus::new(60);
        status.state = StripState::SingleLed;
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "single_led");
    }

    #[test]
    fn set_off_drops_the_color() {
        let mut status = StripStatus::new(60);
        status.state = StripState::Solid;
        status.color = Some("#ff0000".to_string());
        status.set_off();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "off");
        assert_eq!(json["color"], serde_json::Value::Null);
    }

    #[test]
    fn status_hex_normalizes_names() {
        assert_eq!(status_hex("red").as_deref(), Some("#ff0000"));
        assert_eq!(status_hex("bogus"), None);
    }
}
