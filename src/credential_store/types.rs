//! CredentialStore data types

use serde::{Deserialize, Serialize};

/// Camera connection settings. Input to every CGI URL the command client
/// builds; mutated only via the settings flow, read per-request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub host: String,
    pub port: u16,
    pub login: String,
    pub password: String,
}

impl CameraSettings {
    /// Base URL for the camera's CGI endpoints
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// The full persisted record. Serialized as one unit so a PIN write can
/// never leave a partially updated file behind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSettings>,
}
