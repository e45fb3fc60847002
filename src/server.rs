//! HTTP API server: axum router and request handlers.
//!
//! The server runs on the tokio async runtime while the render thread
//! runs on a plain `std::thread`. Communication is via `std::sync::mpsc`.
//! Handlers validate requests (color strings, LED indices, frame sizes)
//! before enqueuing a [`StripCommand`], so a bad request is rejected with
//! a 400 without ever touching the hardware thread.

use crate::color::Color;
use crate::render::{StripCommand, StripState, StripStatus};
use crate::strip::StripConfig;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use serde::Deserialize;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ── App State ────────────────────────────────────────────────────────

/// Shared application state, passed to every handler via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send commands to the render thread
    pub command_tx: Sender<StripCommand>,
    /// Shared strip status (render thread writes, handlers read)
    pub status: Arc<Mutex<StripStatus>>,
    /// Strip dimensions
    pub config: StripConfig,
}

// ── OpenAPI Documentation ────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(
        get_status,
        post_strip_color,
        post_strip_hsl,
        post_strip_led,
        post_strip_rainbow,
        post_strip_clear,
    ),
    components(schemas(
        StripStatus,
        StripState,
        ColorRequest,
        HslRequest,
        LedRequest,
        RainbowRequest,
    )),
    tags(
        (name = "strip", description = "Strip coloring endpoints"),
        (name = "system", description = "System status endpoints"),
    ),
    info(
        title = "LED Strip API",
        version = env!("CARGO_PKG_VERSION"),
        description = "HTTP API for controlling a WS281x RGB LED strip"
    )
)]
pub struct ApiDoc;

// ── Request/Response types ───────────────────────────────────────────

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ColorRequest {
    /// Color name or hex string. Examples: "red", "#ff0000", "0x00ff00", "off"
    #[schema(example = "red")]
    color: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct HslRequest {
    /// Hue in [0, 1]
    #[schema(example = 0.0)]
    h: f64,
    /// Saturation in [0, 1]
    #[schema(example = 0.5)]
    s: f64,
    /// Lightness in [0, 1]
    #[schema(example = 0.5)]
    l: f64,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LedRequest {
    /// Zero-based LED index. Must be less than the strip's LED count.
    #[schema(example = 0)]
    index: usize,
    /// Color name or hex string
    #[schema(example = "blue")]
    color: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RainbowRequest {
    /// Number of pixels to rotate the rainbow left by. Reduced modulo the
    /// strip's LED count.
    #[serde(default)]
    #[schema(example = 0, default = 0)]
    offset: usize,
}

// ── Router ───────────────────────────────────────────────────────────

/// Build the axum router with all API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(
            SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
                .config(
                    utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
                        .validator_url("none"),
                ),
        )
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/strip/color", post(post_strip_color))
        .route("/api/v1/strip/hsl", post(post_strip_hsl))
        .route("/api/v1/strip/led", post(post_strip_led))
        .route("/api/v1/strip/rainbow", post(post_strip_rainbow))
        .route("/api/v1/strip/frame", post(post_strip_frame))
        .route("/api/v1/strip/stream", get(ws_strip_stream))
        .route("/api/v1/strip/clear", post(post_strip_clear))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────

/// GET /api/v1/status — return current strip state
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "system",
    responses(
        (status = 200, description = "Current strip status", body = StripStatus)
    )
)]
async fn get_status(State(state): State<AppState>) -> Json<StripStatus> {
    let status = state.status.lock().unwrap().clone();
    Json(status)
}

/// POST /api/v1/strip/color — shine the whole strip to one color
#[utoipa::path(
    post,
    path = "/api/v1/strip/color",
    tag = "strip",
    request_body = ColorRequest,
    responses(
        (status = 200, description = "Strip color set"),
        (status = 400, description = "Unrecognized color")
    )
)]
async fn post_strip_color(
    State(state): State<AppState>,
    Json(req): Json<ColorRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    validate_color(&req.color)?;

    state
        .command_tx
        .send(StripCommand::Solid(req.color))
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/strip/hsl — shine the whole strip to one HSL color
#[utoipa::path(
    post,
    path = "/api/v1/strip/hsl",
    tag = "strip",
    request_body = HslRequest,
    responses(
        (status = 200, description = "Strip color set"),
    )
)]
async fn post_strip_hsl(
    State(state): State<AppState>,
    Json(req): Json<HslRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .command_tx
        .send(StripCommand::Hsl {
            h: req.h,
            s: req.s,
            l: req.l,
        })
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/strip/led — shine a single LED, all others off
#[utoipa::path(
    post,
    path = "/api/v1/strip/led",
    tag = "strip",
    request_body = LedRequest,
    responses(
        (status = 200, description = "LED set"),
        (status = 400, description = "Unrecognized color or index out of range")
    )
)]
async fn post_strip_led(
    State(state): State<AppState>,
    Json(req): Json<LedRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    validate_color(&req.color)?;

    let count = state.config.pixel_count();
    if req.index >= count {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Cannot shine LED at index {} when the strip only has {} LEDs",
                req.index, count
            ),
        ));
    }

    state
        .command_tx
        .send(StripCommand::Led {
            index: req.index,
            color: req.color,
        })
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/strip/rainbow — shine a rainbow with an optional offset
#[utoipa::path(
    post,
    path = "/api/v1/strip/rainbow",
    tag = "strip",
    request_body = RainbowRequest,
    responses(
        (status = 200, description = "Rainbow displayed"),
    )
)]
async fn post_strip_rainbow(
    State(state): State<AppState>,
    Json(req): Json<RainbowRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .command_tx
        .send(StripCommand::Rainbow { offset: req.offset })
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/strip/frame — push a raw RGB frame
///
/// Expects `application/octet-stream` body with exactly num_leds*3 bytes.
async fn post_strip_frame(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, String)> {
    let expected = state.config.frame_byte_count();
    if body.len() != expected {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Expected {} bytes ({} LEDs x 3 RGB), got {} bytes",
                expected,
                state.config.num_leds,
                body.len()
            ),
        ));
    }

    state
        .command_tx
        .send(StripCommand::Frame(body.to_vec()))
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

/// POST /api/v1/strip/clear — turn every pixel off
#[utoipa::path(
    post,
    path = "/api/v1/strip/clear",
    tag = "strip",
    responses(
        (status = 200, description = "Strip cleared"),
    )
)]
async fn post_strip_clear(
    State(state): State<AppState>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .command_tx
        .send(StripCommand::Clear)
        .map_err(render_thread_gone)?;

    Ok(StatusCode::OK)
}

// ── WebSocket streaming ─────────────────────────────────────────────

/// GET /api/v1/strip/stream — WebSocket endpoint for streaming raw RGB
/// frames.
///
/// Connect with a WebSocket client and send binary messages of exactly
/// num_leds*3 bytes (RGB24). Each message is rendered as one frame; the
/// server keeps no timing state, so the client sequences frames itself.
/// The connection sets status to `Streaming` on connect and back to
/// `Off` on disconnect.
async fn ws_strip_stream(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_stream_socket(socket, state))
}

async fn handle_stream_socket(mut socket: WebSocket, state: AppState) {
    tracing::info!("WebSocket stream client connected");

    {
        let mut s = state.status.lock().unwrap();
        s.state = StripState::Streaming;
        s.color = None;
    }

    let mut frame_count: u64 = 0;

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("WebSocket receive error: {}", e);
                break;
            }
        };

        match msg {
            Message::Binary(data) => {
                let expected = state.config.frame_byte_count();
                if data.len() != expected {
                    tracing::warn!(
                        "WebSocket frame: expected {} bytes, got {}",
                        expected,
                        data.len()
                    );
                    continue;
                }

                if state
                    .command_tx
                    .send(StripCommand::Frame(data.to_vec()))
                    .is_err()
                {
                    tracing::error!("Render thread gone, closing WebSocket");
                    break;
                }

                frame_count += 1;
            }
            Message::Close(_) => break,
            _ => {} // Ignore text, ping/pong handled by axum
        }
    }

    tracing::info!(
        "WebSocket stream client disconnected ({} frames received)",
        frame_count
    );
    state.status.lock().unwrap().set_off();
}

// ── Request validation ───────────────────────────────────────────────

/// Reject color strings the strip cannot resolve.
fn validate_color(color: &str) -> Result<(), (StatusCode, String)> {
    Color::parse(color)
        .map(|_| ())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

fn render_thread_gone<T>(_: std::sync::mpsc::SendError<T>) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Render thread gone".to_string(),
    )
}
