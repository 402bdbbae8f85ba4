//! Application state
//!
//! Holds the shared components and the environment-derived configuration
//! used by the headless viewer binary.

use crate::camera_client::CameraCommandClient;
use crate::credential_store::{CameraSettings, CredentialStore, FileCredentialStore};
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera host
    pub camera_host: String,
    /// Camera CGI port
    pub camera_port: u16,
    /// CGI login
    pub camera_login: String,
    /// CGI password
    pub camera_password: String,
    /// Credential file location
    pub credentials_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_host: std::env::var("CAMERA_HOST")
                .unwrap_or_else(|_| "192.168.1.10".to_string()),
            camera_port: std::env::var("CAMERA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(81),
            camera_login: std::env::var("CAMERA_LOGIN")
                .unwrap_or_else(|_| "admin".to_string()),
            camera_password: std::env::var("CAMERA_PASSWORD").unwrap_or_default(),
            credentials_path: std::env::var("CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("zodiak-credentials.json")),
        }
    }
}

impl AppConfig {
    /// Camera settings as the store persists them
    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            host: self.camera_host.clone(),
            port: self.camera_port,
            login: self.camera_login.clone(),
            password: self.camera_password.clone(),
        }
    }
}

/// Shared application components
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: AppConfig,
    /// Credential store (PIN + camera settings)
    pub store: Arc<FileCredentialStore>,
    /// Camera command client
    pub camera: Arc<CameraCommandClient<FileCredentialStore>>,
}

impl AppState {
    /// Wire the components. Environment settings seed the store on first
    /// run; afterwards the stored settings win.
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = Arc::new(FileCredentialStore::new(&config.credentials_path));

        if store.camera_settings()?.is_none() {
            store.set_camera_settings(&config.camera_settings())?;
            tracing::info!(
                path = %config.credentials_path.display(),
                "Seeded credential store from environment"
            );
        }

        let camera = Arc::new(CameraCommandClient::new(Arc::clone(&store)));

        Ok(Self {
            config,
            store,
            camera,
        })
    }
}
