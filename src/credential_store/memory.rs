//! In-memory credential store
//!
//! Backs tests and short-lived sessions where nothing should touch disk.

use super::types::{CameraSettings, StoredCredentials};
use super::CredentialStore;
use crate::error::{Error, Result};
use std::sync::RwLock;

/// Volatile credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: RwLock<StoredCredentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with camera settings
    pub fn with_settings(settings: CameraSettings) -> Self {
        Self {
            record: RwLock::new(StoredCredentials {
                pin: None,
                camera: Some(settings),
            }),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn pin(&self) -> Result<Option<String>> {
        let record = self
            .record
            .read()
            .map_err(|_| Error::Credential("store lock poisoned".to_string()))?;
        Ok(record.pin.clone().filter(|p| !p.is_empty()))
    }

    fn set_pin(&self, pin: &str) -> Result<()> {
        let mut record = self
            .record
            .write()
            .map_err(|_| Error::Credential("store lock poisoned".to_string()))?;
        record.pin = Some(pin.to_string());
        Ok(())
    }

    fn clear_pin(&self) -> Result<()> {
        let mut record = self
            .record
            .write()
            .map_err(|_| Error::Credential("store lock poisoned".to_string()))?;
        record.pin = None;
        Ok(())
    }

    fn camera_settings(&self) -> Result<Option<CameraSettings>> {
        let record = self
            .record
            .read()
            .map_err(|_| Error::Credential("store lock poisoned".to_string()))?;
        Ok(record.camera.clone())
    }

    fn set_camera_settings(&self, settings: &CameraSettings) -> Result<()> {
        let mut record = self
            .record
            .write()
            .map_err(|_| Error::Credential("store lock poisoned".to_string()))?;
        record.camera = Some(settings.clone());
        Ok(())
    }
}
