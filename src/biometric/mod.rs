//! BiometricGate - platform biometric prompt adapter
//!
//! The platform prompt is an external collaborator; this module only defines
//! the classification the auth flow needs and a headless stub. The PIN flow
//! never sees the specific failure - any non-success falls back to manual
//! entry.

use serde::Serialize;

/// Which biometric the device can evaluate right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometryKind {
    FaceId,
    TouchId,
    None,
}

/// Classified prompt failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricFailure {
    UserCancelled,
    SystemCancelled,
    FallbackRequested,
    PasscodeNotSet,
    BiometryUnavailable,
    NotEnrolled,
    LockedOut,
    Other(String),
}

impl std::fmt::Display for BiometricFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserCancelled => write!(f, "user cancelled"),
            Self::SystemCancelled => write!(f, "system cancelled"),
            Self::FallbackRequested => write!(f, "fallback requested"),
            Self::PasscodeNotSet => write!(f, "device passcode not set"),
            Self::BiometryUnavailable => write!(f, "biometry unavailable"),
            Self::NotEnrolled => write!(f, "biometry not enrolled"),
            Self::LockedOut => write!(f, "biometry locked out"),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Platform biometric prompt behind a trait seam.
///
/// `authenticate` triggers exactly one prompt per call. Concurrent calls are
/// not supported; the auth session serializes by construction.
pub trait BiometricGate: Send + Sync {
    /// Probe current availability. Pure query, safe to call repeatedly.
    fn availability(&self) -> BiometryKind;

    /// Run the prompt once and classify the outcome.
    #[allow(async_fn_in_trait)]
    async fn authenticate(&self, reason: &str) -> std::result::Result<(), BiometricFailure>;
}

/// Gate for hosts without biometric hardware. Always reports unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBiometrics;

impl BiometricGate for NoBiometrics {
    fn availability(&self) -> BiometryKind {
        BiometryKind::None
    }

    async fn authenticate(&self, reason: &str) -> std::result::Result<(), BiometricFailure> {
        tracing::debug!(reason = %reason, "Biometric prompt requested on host without biometrics");
        Err(BiometricFailure::BiometryUnavailable)
    }
}
