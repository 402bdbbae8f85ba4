//! FrameExtractor - MJPEG stream splitting
//!
//! ## Responsibilities
//!
//! - Accumulate raw bytes from the camera's videostream connection
//! - Split on the JPEG end-of-image marker (FF D9), the sole delimiter on
//!   the Zodiak wire (no multipart headers)
//! - Decode each payload and emit it in arrival order; malformed payloads
//!   surface as events instead of disappearing
//!
//! Frames are emitted as soon as the marker completes. Chunk boundaries
//! never affect the emitted frame boundaries.

mod stream;

pub use stream::MjpegStream;

use bytes::Bytes;
use image::GenericImageView;

/// JPEG end-of-image marker
pub const EOI_MARKER: [u8; 2] = [0xFF, 0xD9];

/// One decoded frame. Ephemeral: owned by the consuming view and superseded
/// by the next frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw JPEG payload, end marker included
    pub data: Bytes,
    /// Arrival order, counting emitted frames from zero
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
}

/// Extractor output
#[derive(Debug, Clone)]
pub enum FrameEvent {
    Frame(Frame),
    /// Payload between markers failed to decode. The buffer still advances,
    /// so one bad frame never stalls the stream.
    DecodeFailed {
        /// Sequence the frame would have taken
        sequence_hint: u64,
        len: usize,
        reason: String,
    },
    /// Transport ended cleanly (camera closed the connection)
    Closed,
    /// Transport failed. Terminal; reconnecting is the caller's decision.
    StreamError(String),
}

/// Splits an unbounded byte stream into frames.
///
/// At most one partial frame is pending at any time; everything up to and
/// including each found marker is drained from the accumulator.
#[derive(Debug, Default)]
pub struct FrameExtractor {
    buf: Vec<u8>,
    sequence: u64,
}

impl FrameExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes accumulated but not yet resolved into a frame
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// Append a chunk and emit an event per completed frame. A chunk that
    /// spans several frame boundaries yields several events.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<FrameEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = find_marker(&self.buf) {
            let payload: Vec<u8> = self.buf.drain(..end).collect();
            match image::load_from_memory(&payload) {
                Ok(decoded) => {
                    let (width, height) = decoded.dimensions();
                    events.push(FrameEvent::Frame(Frame {
                        data: Bytes::from(payload),
                        sequence: self.sequence,
                        width,
                        height,
                    }));
                    self.sequence += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        len = payload.len(),
                        error = %e,
                        "Dropping undecodable frame payload"
                    );
                    events.push(FrameEvent::DecodeFailed {
                        sequence_hint: self.sequence,
                        len: payload.len(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        events
    }
}

/// End offset (exclusive) of the first marker, if complete
fn find_marker(buf: &[u8]) -> Option<usize> {
    buf.windows(EOI_MARKER.len())
        .position(|w| w == EOI_MARKER)
        .map(|i| i + EOI_MARKER.len())
}
