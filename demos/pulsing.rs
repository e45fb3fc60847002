//! # Pulsing Colors Example
//!
//! Fills the entire strip with color that smoothly cycles through the
//! rainbow while also pulsing brightness up and down. The frames are
//! sequenced here, in the caller — the controller only exposes discrete
//! render calls.
//!
//! ## Run it
//! ```sh
//! cargo build --release --example pulsing
//! sudo ./target/release/examples/pulsing
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This example requires the 'hardware' feature.");
}

#[cfg(feature = "hardware")]
fn main() {
    use led_strip_rs::{
        Color, StripBuffer, StripConfig, StripController, Ws281xDriver, is_running,
        setup_signal_handler,
    };
    use std::thread;
    use std::time::Duration;

    let config = StripConfig::default();
    let mut controller = StripController::new(Ws281xDriver::new(18, 10));
    controller.setup(config).expect("Failed to set up LED strip");
    let running = setup_signal_handler();
    let mut frame: u32 = 0;

    while is_running(&running) {
        let hue = f64::from(frame % 360) / 360.0;
        let base_color = Color::from_hsl(hue, 0.5, 0.5);

        // Triangle wave brightness: 0 → 100 → 0 over 200 frames
        let brightness_cycle = (frame % 200) as u8;
        let brightness = if brightness_cycle < 100 {
            brightness_cycle
        } else {
            (200 - brightness_cycle as u16) as u8
        };

        let dimmed = base_color.apply_brightness(brightness);
        controller
            .shine_strip(StripBuffer::filled(dimmed, config.pixel_count()))
            .expect("Failed to shine strip");

        frame = frame.wrapping_add(1);
        thread::sleep(Duration::from_millis(16));
    }

    println!("\nShutting down cleanly.");
}
