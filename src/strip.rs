//! Strip configuration, the per-render color buffer, and the controller
//! that owns the hardware driver.
//!
//! Every coloring operation funnels through [`StripController::shine_strip`],
//! which validates the buffer against the configured pixel count and issues
//! exactly one render to the driver. Validation happens before any
//! transmission, so a failed call never partially updates the strip.

use crate::color::Color;
use crate::driver::StripDriver;
use crate::error::StripError;
use crate::pattern;

// ── Strip configuration ────────────────────────────────────────────

/// Configuration for the strip dimensions. Immutable once handed to
/// [`StripController::setup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripConfig {
    pub num_leds: u32,
}

impl StripConfig {
    pub fn new(num_leds: u32) -> Self {
        Self { num_leds }
    }

    /// Number of addressable pixels on the strip.
    pub fn pixel_count(&self) -> usize {
        self.num_leds as usize
    }

    /// Number of bytes in a raw RGB frame (3 bytes per pixel).
    pub fn frame_byte_count(&self) -> usize {
        self.num_leds as usize * 3
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self { num_leds: 60 }
    }
}

// ── Hardware profile ───────────────────────────────────────────────

/// The set of light peripherals a deployment drives.
///
/// Peripherals are selected explicitly at construction instead of being
/// bolted onto shared state. The strip and the single status LED are
/// mutually exclusive hardware modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardwareProfile {
    led_strip: bool,
    status_led: bool,
}

impl HardwareProfile {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_led_strip(mut self) -> Self {
        self.led_strip = true;
        self
    }

    #[must_use]
    pub fn with_status_led(mut self) -> Self {
        self.status_led = true;
        self
    }

    pub fn has_led_strip(&self) -> bool {
        self.led_strip
    }

    pub fn has_status_led(&self) -> bool {
        self.status_led
    }
}

// ── Strip buffer ───────────────────────────────────────────────────

/// An ordered sequence of per-pixel colors; index = physical pixel
/// position. The unit of transmission to the hardware.
///
/// A buffer is created fresh for each render call and consumed by it.
/// The `u8` channels of [`Color`] make out-of-range elements
/// unrepresentable, so validation only needs to check length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripBuffer {
    pixels: Vec<Color>,
}

impl StripBuffer {
    pub fn new(pixels: Vec<Color>) -> Self {
        Self { pixels }
    }

    /// One color repeated `pixel_count` times.
    pub fn filled(color: Color, pixel_count: usize) -> Self {
        Self::new(pattern::solid(color, pixel_count))
    }

    /// All pixels off.
    pub fn off(pixel_count: usize) -> Self {
        Self::filled(Color::OFF, pixel_count)
    }

    /// Decode a raw frame of 3 bytes per pixel, in R, G, B order. This is
    /// the wire format of the HTTP frame and WebSocket endpoints.
    pub fn from_rgb_bytes(data: &[u8]) -> Self {
        let pixels = data
            .chunks_exact(3)
            .map(|px| Color::new(px[0], px[1], px[2]))
            .collect();
        Self { pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Fail unless the buffer holds exactly `pixel_count` colors.
    pub fn validate(&self, pixel_count: usize) -> Result<(), StripError> {
        if self.pixels.len() != pixel_count {
            return Err(StripError::LengthMismatch {
                expected: pixel_count,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Hex form of every pixel, for diagnostic traces.
    fn hex_colors(&self) -> Vec<String> {
        self.pixels.iter().map(|c| c.to_hex()).collect()
    }
}

// ── Strip controller ───────────────────────────────────────────────

/// Owns the strip configuration and the hardware driver, and turns
/// higher-level color requests into validated render calls.
///
/// The controller is single-threaded and synchronous: every call runs to
/// completion before returning, and no internal locking is performed.
/// Callers in multi-threaded programs must serialize access themselves.
///
/// Dropping an initialized controller resets the strip to blank, so the
/// hardware is released on every exit path, including unwinding.
pub struct StripController<D: StripDriver> {
    driver: D,
    profile: HardwareProfile,
    config: Option<StripConfig>,
}

impl<D: StripDriver> StripController<D> {
    /// A controller for a strip-only deployment.
    pub fn new(driver: D) -> Self {
        Self::with_profile(driver, HardwareProfile::new().with_led_strip())
    }

    /// A controller for an explicitly composed set of peripherals.
    pub fn with_profile(driver: D, profile: HardwareProfile) -> Self {
        Self {
            driver,
            profile,
            config: None,
        }
    }

    /// One-time strip setup: checks the hardware profile, initializes the
    /// driver with the configured pixel count, and records the
    /// configuration. A second call fails with
    /// [`StripError::AlreadyConfigured`].
    pub fn setup(&mut self, config: StripConfig) -> Result<(), StripError> {
        if self.config.is_some() {
            return Err(StripError::AlreadyConfigured);
        }
        if self.profile.has_status_led() {
            return Err(StripError::ConflictingPeripheral);
        }
        if !self.profile.has_led_strip() {
            return Err(StripError::StripNotSelected);
        }

        tracing::debug!("initializing LED strip with {} LEDs", config.num_leds);
        self.driver.init(config.pixel_count())?;
        self.config = Some(config);
        Ok(())
    }

    /// The recorded configuration, once `setup` has succeeded.
    pub fn config(&self) -> Option<StripConfig> {
        self.config
    }

    fn assert_initialized(&self) -> Result<StripConfig, StripError> {
        self.config.ok_or(StripError::NotInitialized)
    }

    /// Render a full buffer to the strip. The single choke point for all
    /// coloring operations: validates length, then forwards the exact
    /// buffer values to the driver.
    pub fn shine_strip(&mut self, buffer: StripBuffer) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        buffer.validate(config.pixel_count())?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!("shining LED strip to {:?}", buffer.hex_colors());
        }
        self.driver.render(&buffer)
    }

    /// Shine the whole strip to a single color, given as a name or hex
    /// string resolvable by [`Color::parse`].
    pub fn shine_strip_with_color(&mut self, color: &str) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        let color = Color::parse(color)?;
        self.shine_strip(StripBuffer::filled(color, config.pixel_count()))
    }

    /// Shine the whole strip to a single HSL color.
    pub fn shine_strip_with_hsl(&mut self, h: f64, s: f64, l: f64) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        let color = Color::from_hsl(h, s, l);
        self.shine_strip(StripBuffer::filled(color, config.pixel_count()))
    }

    /// Shine a single LED and turn every other pixel off. The index must
    /// be within `[0, pixel_count)`; out-of-range indices are rejected,
    /// never wrapped.
    pub fn shine_led(&mut self, index: usize, color: &str) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        let count = config.pixel_count();
        if index >= count {
            return Err(StripError::IndexOutOfRange { index, count });
        }
        let color = Color::parse(color)?;
        self.shine_strip(StripBuffer::new(pattern::single(index, color, count)))
    }

    /// Shine the strip to a rainbow, rotated left by `offset` pixels
    /// (reduced modulo the pixel count).
    pub fn rainbow_strip(&mut self, offset: usize) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        let colors = pattern::rainbow_colors(config.pixel_count(), offset);
        self.shine_strip(StripBuffer::new(colors))
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) -> Result<(), StripError> {
        let config = self.assert_initialized()?;
        self.shine_strip(StripBuffer::off(config.pixel_count()))
    }
}

impl<D: StripDriver> Drop for StripController<D> {
    fn drop(&mut self) {
        if self.config.is_some() {
            if let Err(e) = self.driver.reset() {
                tracing::warn!("failed to blank LED strip on shutdown: {e}");
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared view into everything a [`RecordingDriver`] was asked to do.
    #[derive(Clone, Default)]
    struct DriverLog(Rc<RefCell<LogInner>>);

    #[derive(Default)]
    struct LogInner {
        init_count: Option<usize>,
        frames: Vec<Vec<Color>>,
        resets: usize,
    }

    impl DriverLog {
        fn init_count(&self) -> Option<usize> {
            self.0.borrow().init_count
        }

        fn frames(&self) -> Vec<Vec<Color>> {
            self.0.borrow().frames.clone()
        }

        fn resets(&self) -> usize {
            self.0.borrow().resets
        }
    }

    /// Test double standing in for the hardware: records every call.
    #[derive(Default)]
    struct RecordingDriver {
        log: DriverLog,
    }

    impl RecordingDriver {
        fn with_log() -> (Self, DriverLog) {
            let driver = Self::default();
            let log = driver.log.clone();
            (driver, log)
        }
    }

    impl StripDriver for RecordingDriver {
        fn init(&mut self, pixel_count: usize) -> Result<(), StripError> {
            self.log.0.borrow_mut().init_count = Some(pixel_count);
            Ok(())
        }

        fn render(&mut self, buffer: &StripBuffer) -> Result<(), StripError> {
            self.log.0.borrow_mut().frames.push(buffer.pixels().to_vec());
            Ok(())
        }

        fn reset(&mut self) -> Result<(), StripError> {
            self.log.0.borrow_mut().resets += 1;
            Ok(())
        }
    }

    fn ready_controller(num_leds: u32) -> (StripController<RecordingDriver>, DriverLog) {
        let (driver, log) = RecordingDriver::with_log();
        let mut controller = StripController::new(driver);
        controller.setup(StripConfig::new(num_leds)).unwrap();
        (controller, log)
    }

    // ── StripConfig tests ──────────────────────────────────────────

    #[test]
    fn strip_config_default_is_60_leds() {
        assert_eq!(StripConfig::default().num_leds, 60);
    }

    #[rstest]
    #[case(60, 180)]
    #[case(180, 540)]
    #[case(1, 3)]
    fn test_frame_byte_count(#[case] num_leds: u32, #[case] expected: usize) {
        assert_eq!(StripConfig::new(num_leds).frame_byte_count(), expected);
    }

    // ── Setup tests ────────────────────────────────────────────────

    #[test]
    fn setup_initializes_driver_with_pixel_count() {
        let (controller, log) = ready_controller(60);
        assert_eq!(log.init_count(), Some(60));
        assert_eq!(controller.config(), Some(StripConfig::new(60)));
    }

    #[test]
    fn setup_twice_fails() {
        let (mut controller, _log) = ready_controller(60);
        assert!(matches!(
            controller.setup(StripConfig::new(60)),
            Err(StripError::AlreadyConfigured)
        ));
    }

    #[test]
    fn setup_rejects_conflicting_status_led() {
        let profile = HardwareProfile::new().with_led_strip().with_status_led();
        let mut controller = StripController::with_profile(RecordingDriver::default(), profile);
        assert!(matches!(
            controller.setup(StripConfig::default()),
            Err(StripError::ConflictingPeripheral)
        ));
    }

    #[test]
    fn setup_rejects_profile_without_strip() {
        let profile = HardwareProfile::new();
        let mut controller = StripController::with_profile(RecordingDriver::default(), profile);
        assert!(matches!(
            controller.setup(StripConfig::default()),
            Err(StripError::StripNotSelected)
        ));
    }

    #[test]
    fn coloring_before_setup_fails() {
        let mut controller = StripController::new(RecordingDriver::default());
        assert!(matches!(
            controller.shine_strip(StripBuffer::off(60)),
            Err(StripError::NotInitialized)
        ));
        assert!(matches!(
            controller.shine_strip_with_color("red"),
            Err(StripError::NotInitialized)
        ));
        assert!(matches!(
            controller.shine_strip_with_hsl(0.0, 0.5, 0.5),
            Err(StripError::NotInitialized)
        ));
        assert!(matches!(
            controller.shine_led(0, "red"),
            Err(StripError::NotInitialized)
        ));
        assert!(matches!(
            controller.rainbow_strip(0),
            Err(StripError::NotInitialized)
        ));
        assert!(matches!(controller.clear(), Err(StripError::NotInitialized)));
    }

    // ── shine_strip tests ──────────────────────────────────────────

    #[rstest]
    #[case(59)]
    #[case(61)]
    #[case(0)]
    fn shine_strip_rejects_wrong_length(#[case] len: usize) {
        let (mut controller, log) = ready_controller(60);
        let err = controller
            .shine_strip(StripBuffer::off(len))
            .unwrap_err();
        assert!(matches!(
            err,
            StripError::LengthMismatch {
                expected: 60,
                actual
            } if actual == len
        ));
        // Nothing reached the hardware.
        assert_eq!(log.frames().len(), 0);
    }

    #[test]
    fn shine_strip_forwards_exact_values() {
        let (mut controller, log) = ready_controller(3);
        let pixels = vec![
            Color::new(1, 2, 3),
            Color::new(4, 5, 6),
            Color::new(7, 8, 9),
        ];
        controller
            .shine_strip(StripBuffer::new(pixels.clone()))
            .unwrap();
        assert_eq!(log.frames(), vec![pixels]);
    }

    // ── Coloring operation tests ───────────────────────────────────

    #[test]
    fn shine_strip_with_color_fills_with_red() {
        let (mut controller, log) = ready_controller(180);
        controller.shine_strip_with_color("red").unwrap();
        assert_eq!(log.frames(), vec![vec![Color::new(255, 0, 0); 180]]);
    }

    #[test]
    fn shine_strip_with_color_off_blanks() {
        let (mut controller, log) = ready_controller(180);
        controller.shine_strip_with_color("off").unwrap();
        assert_eq!(log.frames(), vec![vec![Color::OFF; 180]]);
    }

    #[test]
    fn shine_strip_with_color_rejects_unknown_name() {
        let (mut controller, log) = ready_controller(60);
        assert!(matches!(
            controller.shine_strip_with_color("bogus"),
            Err(StripError::InvalidColor(_))
        ));
        assert_eq!(log.frames().len(), 0);
    }

    #[test]
    fn shine_strip_with_hsl_fills_converted_color() {
        let (mut controller, log) = ready_controller(60);
        controller.shine_strip_with_hsl(0.0, 0.5, 0.5).unwrap();
        assert_eq!(log.frames(), vec![vec![Color::new(191, 64, 64); 60]]);
    }

    #[test]
    fn shine_led_last_index_succeeds() {
        let (mut controller, log) = ready_controller(60);
        controller.shine_led(59, "blue").unwrap();
        let frame = &log.frames()[0];
        assert_eq!(frame[59], Color::new(0, 0, 255));
        assert!(frame[..59].iter().all(|c| *c == Color::OFF));
    }

    #[test]
    fn shine_led_at_pixel_count_fails() {
        let (mut controller, log) = ready_controller(60);
        assert!(matches!(
            controller.shine_led(60, "blue"),
            Err(StripError::IndexOutOfRange {
                index: 60,
                count: 60
            })
        ));
        assert_eq!(log.frames().len(), 0);
    }

    #[test]
    fn rainbow_strip_forwards_the_offset() {
        let (mut controller, log) = ready_controller(60);
        controller.rainbow_strip(7).unwrap();
        assert_eq!(log.frames(), vec![crate::pattern::rainbow_colors(60, 7)]);
    }

    #[test]
    fn clear_turns_every_pixel_off() {
        let (mut controller, log) = ready_controller(60);
        controller.clear().unwrap();
        assert_eq!(log.frames(), vec![vec![Color::OFF; 60]]);
    }

    // ── Teardown tests ─────────────────────────────────────────────

    #[test]
    fn drop_resets_an_initialized_strip() {
        let (controller, log) = ready_controller(60);
        drop(controller);
        assert_eq!(log.resets(), 1);
    }

    #[test]
    fn drop_skips_reset_when_never_set_up() {
        let (driver, log) = RecordingDriver::with_log();
        let controller = StripController::new(driver);
        drop(controller);
        assert_eq!(log.resets(), 0);
    }

    // ── StripBuffer tests ──────────────────────────────────────────

    #[test]
    fn buffer_from_rgb_bytes_decodes_pixels() {
        let buffer = StripBuffer::from_rgb_bytes(&[255, 0, 0, 0, 255, 0, 1, 2, 3]);
        assert_eq!(
            buffer.pixels(),
            &[
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(1, 2, 3)
            ]
        );
    }

    #[test]
    fn buffer_validate_checks_length() {
        let buffer = StripBuffer::off(10);
        assert!(buffer.validate(10).is_ok());
        assert!(matches!(
            buffer.validate(11),
            Err(StripError::LengthMismatch {
                expected: 11,
                actual: 10
            })
        ));
    }
}
