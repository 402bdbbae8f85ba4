//! File-backed credential store
//!
//! JSON record on disk, rewritten whole on every update. The write goes to a
//! sibling temp file first and is renamed into place, so readers never see a
//! half-written record.

use super::types::StoredCredentials;
use super::CredentialStore;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Credential store persisted to a single JSON file
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by `path`. The file is created lazily on the
    /// first write; a missing file reads as an empty record.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoredCredentials> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredCredentials::default());
            }
            Err(e) => {
                return Err(Error::Credential(format!(
                    "read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        serde_json::from_slice(&raw).map_err(|e| {
            Error::Credential(format!("malformed record {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, record: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_vec_pretty(record)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &raw)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                Error::Credential(format!("write {}: {}", self.path.display(), e))
            })?;

        tracing::debug!(path = %self.path.display(), "Credential record saved");
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn pin(&self) -> Result<Option<String>> {
        Ok(self.load()?.pin.filter(|p| !p.is_empty()))
    }

    fn set_pin(&self, pin: &str) -> Result<()> {
        let mut record = self.load()?;
        record.pin = Some(pin.to_string());
        self.save(&record)
    }

    fn clear_pin(&self) -> Result<()> {
        let mut record = self.load()?;
        record.pin = None;
        self.save(&record)
    }

    fn camera_settings(&self) -> Result<Option<super::CameraSettings>> {
        Ok(self.load()?.camera)
    }

    fn set_camera_settings(&self, settings: &super::CameraSettings) -> Result<()> {
        let mut record = self.load()?;
        record.camera = Some(settings.clone());
        self.save(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential_store::CameraSettings;

    fn temp_store() -> (tempfile::TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        assert_eq!(store.pin().unwrap(), None);
        assert!(store.camera_settings().unwrap().is_none());
        assert!(!store.lock_enabled().unwrap());
    }

    #[test]
    fn pin_roundtrip_and_clear() {
        let (_dir, store) = temp_store();
        store.set_pin("1234").unwrap();
        assert_eq!(store.pin().unwrap().as_deref(), Some("1234"));
        assert!(store.lock_enabled().unwrap());

        store.clear_pin().unwrap();
        assert_eq!(store.pin().unwrap(), None);
        assert!(!store.lock_enabled().unwrap());
    }

    #[test]
    fn settings_survive_pin_updates() {
        let (_dir, store) = temp_store();
        let settings = CameraSettings {
            host: "192.168.1.10".to_string(),
            port: 81,
            login: "admin".to_string(),
            password: "secret".to_string(),
        };
        store.set_camera_settings(&settings).unwrap();
        store.set_pin("0000").unwrap();

        assert_eq!(store.camera_settings().unwrap(), Some(settings));
        assert_eq!(store.pin().unwrap().as_deref(), Some("0000"));
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_panic() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), b"not json").unwrap();
        assert!(matches!(store.pin(), Err(Error::Credential(_))));
    }
}
