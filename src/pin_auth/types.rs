//! PinAuth type definitions

use crate::biometric::BiometryKind;
use serde::Serialize;

/// Which flow the machine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Compare entered digits against the stored PIN
    Verify,
    /// Enter, re-enter to confirm, persist on match
    Register,
}

/// Prompt line shown above the dot indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    EnterPasscode,
    ConfirmPasscode,
    WrongPasscode,
}

impl Prompt {
    /// Display text
    pub fn text(&self) -> &'static str {
        match self {
            Self::EnterPasscode => "Enter passcode",
            Self::ConfirmPasscode => "Confirm passcode",
            Self::WrongPasscode => "Wrong passcode",
        }
    }
}

/// Machine state. `Finished` is terminal; the owning screen tears the
/// machine down after consuming the success signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    InProgress { prompt: Prompt, digits: Vec<u8> },
    /// Register only: first entry accepted, awaiting re-entry
    Confirm { pending: Vec<u8>, digits: Vec<u8> },
    Finished,
}

impl AuthState {
    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress { .. } => "in_progress",
            Self::Confirm { .. } => "confirm",
            Self::Finished => "finished",
        }
    }
}

/// Input events, as forwarded by the lock screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Start,
    Digit(u8),
    Backspace,
    BiometricRequested,
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Digit(_) => "digit",
            Self::Backspace => "backspace",
            Self::BiometricRequested => "biometric_requested",
        }
    }
}

/// Snapshot consumed by the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub prompt: Prompt,
    pub filled_digits: usize,
    pub biometry: BiometryKind,
}

/// Observer signal. `Success` is emitted exactly once, on reaching
/// `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    View(ViewState),
    Success,
}
