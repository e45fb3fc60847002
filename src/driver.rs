//! Strip driver abstraction.
//!
//! The controller is generic over [`StripDriver`] so color logic can be
//! tested on any machine. The real hardware implementation wraps
//! `rs_ws281x` and only builds with the `hardware` feature, on a
//! Raspberry Pi.

use crate::error::StripError;
use crate::strip::StripBuffer;

/// The contract the controller consumes from strip hardware.
pub trait StripDriver {
    /// Prepare the hardware for a strip of `pixel_count` LEDs.
    fn init(&mut self, pixel_count: usize) -> Result<(), StripError>;

    /// Transmit a full buffer to the strip in one atomic operation. The
    /// buffer length must equal the initialized pixel count.
    fn render(&mut self, buffer: &StripBuffer) -> Result<(), StripError>;

    /// Blank every pixel. Safe to call on an uninitialized driver, and
    /// idempotent.
    fn reset(&mut self) -> Result<(), StripError>;
}

#[cfg(feature = "hardware")]
pub use hardware::Ws281xDriver;

#[cfg(feature = "hardware")]
mod hardware {
    use super::StripDriver;
    use crate::error::StripError;
    use crate::strip::StripBuffer;
    use rs_ws281x::{ChannelBuilder, Controller, ControllerBuilder, StripType};

    /// WS281x signal frequency in Hz.
    const TARGET_FREQ: u32 = 800_000;

    /// Driver for WS281x strips on Raspberry Pi GPIO, via `rs_ws281x`.
    ///
    /// The underlying C library owns a DMA channel, so at most one
    /// controller may exist per process.
    pub struct Ws281xDriver {
        pin: i32,
        dma: i32,
        controller: Option<Controller>,
    }

    impl Ws281xDriver {
        /// A driver on the given GPIO pin (18 is the usual PWM pin) and
        /// DMA channel.
        pub fn new(pin: i32, dma: i32) -> Self {
            Self {
                pin,
                dma,
                controller: None,
            }
        }
    }

    impl StripDriver for Ws281xDriver {
        fn init(&mut self, pixel_count: usize) -> Result<(), StripError> {
            if self.controller.is_some() {
                return Err(StripError::AlreadyConfigured);
            }

            let controller = ControllerBuilder::new()
                .freq(TARGET_FREQ)
                .dma(self.dma)
                .channel(
                    0,
                    ChannelBuilder::new()
                        .pin(self.pin)
                        .count(pixel_count as i32)
                        .strip_type(StripType::Ws2812)
                        .brightness(255)
                        .build(),
                )
                .build()
                .map_err(|e| StripError::Driver(e.to_string()))?;

            self.controller = Some(controller);
            Ok(())
        }

        fn render(&mut self, buffer: &StripBuffer) -> Result<(), StripError> {
            let controller = self.controller.as_mut().ok_or(StripError::NotInitialized)?;

            {
                let leds = controller.leds_mut(0);
                if leds.len() != buffer.len() {
                    return Err(StripError::Driver(format!(
                        "strip initialized with {} LEDs, buffer has {}",
                        leds.len(),
                        buffer.len()
                    )));
                }
                // The hardware channel order is [B, G, R, W].
                for (led, color) in leds.iter_mut().zip(buffer.pixels()) {
                    *led = [color.b, color.g, color.r, 0];
                }
            }

            controller
                .render()
                .map_err(|e| StripError::Driver(e.to_string()))
        }

        fn reset(&mut self) -> Result<(), StripError> {
            let Some(controller) = self.controller.as_mut() else {
                return Ok(());
            };

            for led in controller.leds_mut(0) {
                *led = [0, 0, 0, 0];
            }
            controller
                .render()
                .map_err(|e| StripError::Driver(e.to_string()))
        }
    }
}
