//! Zodiak camera viewer - headless demo
//!
//! Connects to the configured camera, logs its current parameters, then
//! streams frames and reports throughput until interrupted. Stream errors
//! end the run; reconnecting is a user decision, not an automatic one.

use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zodiak_camclient::frame_extractor::FrameEvent;
use zodiak_camclient::{AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zodiak_camclient=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Zodiak camera viewer v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::default();
    tracing::info!(
        camera_host = %config.camera_host,
        camera_port = config.camera_port,
        credentials_path = %config.credentials_path.display(),
        "Configuration loaded"
    );

    let state = AppState::new(config)?;

    match state.camera.read_params().await {
        Ok(params) => tracing::info!(
            brightness = ?params.brightness(),
            contrast = ?params.contrast(),
            saturation = ?params.saturation(),
            ir = ?params.ir_status(),
            "Camera parameters"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not read camera parameters"),
    }

    let mut stream = state.camera.open_stream().await?;
    tracing::info!("Streaming, press Ctrl-C to exit");

    let started = Instant::now();
    let mut frames: u64 = 0;
    let mut decode_failures: u64 = 0;

    loop {
        tokio::select! {
            event = stream.next_event() => match event {
                Some(FrameEvent::Frame(frame)) => {
                    frames += 1;
                    if frames % 100 == 0 {
                        let fps = frames as f64 / started.elapsed().as_secs_f64();
                        tracing::info!(
                            frames,
                            width = frame.width,
                            height = frame.height,
                            fps,
                            "Streaming"
                        );
                    }
                }
                Some(FrameEvent::DecodeFailed { len, reason, .. }) => {
                    decode_failures += 1;
                    tracing::warn!(len, reason = %reason, decode_failures, "Frame decode failed");
                }
                Some(FrameEvent::Closed) => {
                    tracing::info!("Camera closed the stream");
                    break;
                }
                Some(FrameEvent::StreamError(message)) => {
                    tracing::error!(error = %message, "Stream failed");
                    break;
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    tracing::info!(frames, decode_failures, "Viewer stopped");
    Ok(())
}
