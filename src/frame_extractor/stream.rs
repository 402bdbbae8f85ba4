//! Live MJPEG connection
//!
//! Pumps the videostream response body through a `FrameExtractor` on a
//! background task and hands the events to the owner over a channel. Bytes
//! arrive strictly ordered on one task; the owner marshals to its own
//! context by draining the channel. No automatic reconnect.

use super::{FrameEvent, FrameExtractor};
use crate::error::{Error, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An open videostream connection
pub struct MjpegStream {
    events: mpsc::UnboundedReceiver<FrameEvent>,
    pump: JoinHandle<()>,
}

impl MjpegStream {
    /// Connect and start pumping frames.
    ///
    /// The client must not carry a whole-request timeout; the body is
    /// unbounded by design.
    pub async fn open(client: reqwest::Client, url: String) -> Result<Self> {
        let resp = client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "videostream returned {}",
                status
            )));
        }

        tracing::info!(status = %status, "Videostream connected");

        let (tx, events) = mpsc::unbounded_channel();
        let pump = tokio::spawn(async move {
            let mut extractor = FrameExtractor::new();
            let mut body = resp.bytes_stream();

            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(chunk) => {
                        for event in extractor.push(&chunk) {
                            if tx.send(event).is_err() {
                                // Receiver gone: dropping the body tears the
                                // connection down.
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Videostream transport error");
                        let _ = tx.send(FrameEvent::StreamError(e.to_string()));
                        return;
                    }
                }
            }

            tracing::info!("Videostream closed by camera");
            let _ = tx.send(FrameEvent::Closed);
        });

        Ok(Self { events, pump })
    }

    /// Next event, in arrival order. `None` after a terminal event once the
    /// pump has wound down.
    pub async fn next_event(&mut self) -> Option<FrameEvent> {
        self.events.recv().await
    }
}

impl Drop for MjpegStream {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
