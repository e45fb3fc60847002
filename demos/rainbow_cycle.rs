//! # Rainbow Cycle Example
//!
//! Shines a rainbow across the strip and rotates it one pixel per frame
//! using the pattern offset, until Ctrl+C.
//!
//! ## Run it
//! ```sh
//! cargo build --release --example rainbow_cycle
//! sudo ./target/release/examples/rainbow_cycle
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This example requires the 'hardware' feature.");
}

#[cfg(feature = "hardware")]
fn main() {
    use led_strip_rs::{StripConfig, StripController, Ws281xDriver, is_running, setup_signal_handler};
    use std::thread;
    use std::time::Duration;

    let config = StripConfig::default();
    let mut controller = StripController::new(Ws281xDriver::new(18, 10));
    controller.setup(config).expect("Failed to set up LED strip");
    let running = setup_signal_handler();

    let mut offset = 0;
    while is_running(&running) {
        controller
            .rainbow_strip(offset)
            .expect("Failed to shine rainbow");
        offset = (offset + 1) % config.pixel_count();
        thread::sleep(Duration::from_millis(50));
    }

    println!("\nShutting down cleanly.");
    // Dropping the controller blanks the strip.
}
