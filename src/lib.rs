//! Zodiak Camera Client Library
//!
//! Core of a viewer/controller for Zodiak-style pan-tilt CGI cameras.
//!
//! ## Architecture (6 Components)
//!
//! 1. FrameExtractor - MJPEG byte stream to ordered frames
//! 2. PinAuth - PIN verify/register state machine behind the lock screen
//! 3. BiometricGate - platform biometric prompt adapter
//! 4. CredentialStore - SSoT for the PIN and camera connection settings
//! 5. CameraCommandClient - pan/tilt/stop and image settings over CGI
//! 6. ArcGeometry - radial slider track math
//!
//! ## Design Principles
//!
//! - SSoT: all secrets and connection settings live in the CredentialStore
//! - Pure cores: state machines and geometry never touch IO; thin async
//!   adapters around them do
//! - No auto-retry: stream and command failures surface once and stay
//!   surfaced until the owner acts

pub mod arc_geometry;
pub mod biometric;
pub mod camera_client;
pub mod credential_store;
pub mod error;
pub mod frame_extractor;
pub mod pin_auth;
pub mod state;

pub use error::{Error, Result};
pub use state::{AppConfig, AppState};
