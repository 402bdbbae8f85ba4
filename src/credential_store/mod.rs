//! CredentialStore - Single Source of Truth for secrets and connection settings
//!
//! ## Responsibilities
//!
//! - PIN passcode persistence (presence of a non-empty PIN is the sole
//!   "lock enabled" flag)
//! - Camera connection settings persistence
//!
//! ## Design Principles
//!
//! - SSoT: the auth flow and the command client both read through here,
//!   per-request, with no local copies
//! - Injected explicitly into consumers; no ambient global state
//! - A read/write failure degrades to "no PIN set" at the call site rather
//!   than aborting the flow

mod file;
mod memory;
mod types;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use types::{CameraSettings, StoredCredentials};

use crate::error::Result;

/// Storage interface for the PIN and the camera connection settings.
///
/// The platform analog (a keychain) is a synchronous API and the payload is
/// tens of bytes, so the interface is synchronous as well.
pub trait CredentialStore: Send + Sync {
    /// Stored PIN, if any. An empty string counts as unset.
    fn pin(&self) -> Result<Option<String>>;

    /// Persist the PIN. Whole-record write; never partially overwritten.
    fn set_pin(&self, pin: &str) -> Result<()>;

    /// Remove the PIN (disables the lock).
    fn clear_pin(&self) -> Result<()>;

    /// Stored camera connection settings, if any.
    fn camera_settings(&self) -> Result<Option<CameraSettings>>;

    /// Persist the camera connection settings.
    fn set_camera_settings(&self, settings: &CameraSettings) -> Result<()>;

    /// Whether PIN protection is enabled.
    fn lock_enabled(&self) -> Result<bool> {
        Ok(self.pin()?.map_or(false, |p| !p.is_empty()))
    }
}
