//! LED Strip HTTP API Server
//!
//! Runs a web server on the Pi that accepts commands to control a WS281x
//! RGB LED strip. Any device on the LAN can shine colors, light single
//! LEDs, display rainbows, or push raw frames via simple HTTP requests.
//!
//! ## Architecture
//! - **Render thread** (std::thread): owns the strip hardware, processes
//!   commands
//! - **HTTP server** (tokio/axum): accepts API requests, sends commands
//!   via channel
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/led-strip-rs --num-leds 60 --port 8080
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rs_ws281x).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    hardware_main();
}

#[cfg(feature = "hardware")]
#[tokio::main(flavor = "current_thread")]
async fn hardware_main() {
    use clap::Parser;
    use led_strip_rs::StripConfig;
    use led_strip_rs::render::{StripStatus, render_loop};
    use led_strip_rs::server::{self, AppState};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    /// LED Strip HTTP API Server
    #[derive(Parser)]
    #[command(name = "led-strip-rs")]
    #[command(about = "HTTP API server for controlling a WS281x RGB LED strip")]
    #[command(version)]
    struct Args {
        /// Number of LEDs on the strip
        #[arg(long, default_value = "60")]
        num_leds: u32,

        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// GPIO pin driving the strip's data line
        #[arg(long, default_value = "18")]
        pin: i32,

        /// DMA channel for the WS281x signal
        #[arg(long, default_value = "10")]
        dma: i32,
    }

    // Initialize tracing subscriber for request logging. The log level
    // comes from RUST_LOG; default is info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();
    let config = StripConfig::new(args.num_leds);

    tracing::info!("LED Strip HTTP Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Strip: {} LEDs", config.num_leds);
    tracing::info!("GPIO pin: {}, DMA channel: {}", args.pin, args.dma);
    tracing::info!("Port: {}", args.port);

    // Create the channel for sending commands to the render thread.
    let (tx, rx) = mpsc::channel();

    // Shared strip status — render thread writes, HTTP handlers read.
    let status = Arc::new(Mutex::new(StripStatus::new(config.num_leds)));

    // Spawn the render thread.
    let render_status = status.clone();
    let render_handle = std::thread::spawn(move || {
        render_loop(rx, render_status, config, args.pin, args.dma);
    });

    // Build the HTTP server
    let app_state = AppState {
        command_tx: tx,
        status,
        config,
    };

    let app = server::create_router(app_state);

    // Start listening
    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API Documentation: http://localhost:{}/docs", args.port);
    tracing::info!("Try: curl http://localhost:{}/api/v1/status", args.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    // Run the server — this blocks until the process is killed
    axum::serve(listener, app).await.expect("Server error");

    drop(render_handle);
}
