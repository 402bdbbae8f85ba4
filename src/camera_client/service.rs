//! Camera command service

use super::params::{parse_params, CameraParams};
use super::types::{CommandOutcome, MoveDirection, SettingParam, STOP_COMMAND};
use crate::credential_store::{CameraSettings, CredentialStore};
use crate::error::{Error, Result};
use crate::frame_extractor::MjpegStream;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// In-flight directional command
struct ActiveMove {
    direction: MoveDirection,
    request: JoinHandle<()>,
}

/// Command client for one camera. Connection settings are read from the
/// injected store per-request; nothing is cached here.
pub struct CameraCommandClient<S: CredentialStore> {
    store: Arc<S>,
    client: reqwest::Client,
    /// Separate client without a whole-request timeout; the videostream
    /// body is unbounded.
    stream_client: reqwest::Client,
    /// At most one directional command in flight (last-writer-wins)
    active_move: Mutex<Option<ActiveMove>>,
    outcomes: Option<mpsc::UnboundedSender<CommandOutcome>>,
}

impl<S: CredentialStore> CameraCommandClient<S> {
    pub fn new(store: Arc<S>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        let stream_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            store,
            client,
            stream_client,
            active_move: Mutex::new(None),
            outcomes: None,
        }
    }

    /// Receive a completion report per directional command. Call before
    /// sharing the client.
    pub fn subscribe_outcomes(&mut self) -> mpsc::UnboundedReceiver<CommandOutcome> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outcomes = Some(tx);
        rx
    }

    /// Fire a directional command. Any still-in-flight directional command
    /// is cancelled first, so rapid joystick changes never leave the camera
    /// drifting on a stale command.
    pub async fn move_camera(&self, direction: MoveDirection) -> Result<()> {
        let settings = self.settings()?;
        let url = cgi_url(
            &settings,
            "decoder_control.cgi",
            &format!("&command={}&onestep=0", direction.command_code()),
        );

        let mut active = self.active_move.lock().await;
        if let Some(prev) = active.take() {
            prev.request.abort();
            tracing::debug!(
                superseded = ?prev.direction,
                by = ?direction,
                "Cancelled in-flight move command"
            );
        }

        let client = self.client.clone();
        let outcomes = self.outcomes.clone();
        let request = tokio::spawn(async move {
            match send_command(&client, &url).await {
                Ok(()) => {
                    tracing::debug!(direction = ?direction, "Move command delivered");
                    if let Some(tx) = outcomes {
                        let _ = tx.send(CommandOutcome::success(direction));
                    }
                }
                Err(e) => {
                    tracing::warn!(direction = ?direction, error = %e, "Move command failed");
                    if let Some(tx) = outcomes {
                        let _ = tx.send(CommandOutcome::failure(direction, e.to_string()));
                    }
                }
            }
        });
        *active = Some(ActiveMove { direction, request });

        Ok(())
    }

    /// Halt movement. Exempt from the cancellation bookkeeping: stop always
    /// fires and is never itself cancelled by a later command.
    pub async fn stop(&self) -> Result<()> {
        let settings = self.settings()?;
        let url = cgi_url(
            &settings,
            "decoder_control.cgi",
            &format!("&command={}&onestep=0", STOP_COMMAND),
        );

        let client = self.client.clone();
        tokio::spawn(async move {
            match send_command(&client, &url).await {
                Ok(()) => tracing::debug!("Stop command delivered"),
                Err(e) => tracing::warn!(error = %e, "Stop command failed"),
            }
        });

        Ok(())
    }

    /// Resume placeholder. No network effect on the Zodiak wire.
    pub fn start(&self) {
        tracing::debug!("Start command is a no-op");
    }

    /// Change one image setting, then read the device state back. The
    /// device may clamp or reject the value, so the returned params are
    /// what it actually applied.
    pub async fn change_setting(&self, param: SettingParam, value: i64) -> Result<CameraParams> {
        let settings = self.settings()?;
        let url = cgi_url(
            &settings,
            "camera_control.cgi",
            &format!("&param={}&value={}&{}", param.code(), value, cache_buster()),
        );

        match send_command(&self.client, &url).await {
            Ok(()) => tracing::debug!(param = ?param, value, "Setting change delivered"),
            Err(e) => {
                tracing::warn!(param = ?param, value, error = %e, "Setting change failed, reconciling anyway");
            }
        }

        self.read_params().await
    }

    /// Current device parameters
    pub async fn read_params(&self) -> Result<CameraParams> {
        let settings = self.settings()?;
        let url = cgi_url(&settings, "get_camera_params.cgi", "");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "get_camera_params returned {}",
                status
            )));
        }

        let body = resp.text().await?;
        parse_params(&body)
    }

    /// Single still image
    pub async fn snapshot(&self) -> Result<Bytes> {
        let settings = self.settings()?;
        let url = cgi_url(&settings, "snapshot.cgi", "");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Network(format!("snapshot returned {}", status)));
        }

        Ok(resp.bytes().await?)
    }

    /// Videostream URL for the MJPEG connection
    pub fn stream_url(&self) -> Result<String> {
        let settings = self.settings()?;
        Ok(cgi_url(&settings, "videostream.cgi", ""))
    }

    /// Open the live MJPEG stream
    pub async fn open_stream(&self) -> Result<MjpegStream> {
        MjpegStream::open(self.stream_client.clone(), self.stream_url()?).await
    }

    fn settings(&self) -> Result<CameraSettings> {
        self.store
            .camera_settings()?
            .ok_or_else(|| Error::Validation("camera settings not configured".to_string()))
    }
}

/// CGI URL with credentials in the query string, the Zodiak convention
fn cgi_url(settings: &CameraSettings, endpoint: &str, extra: &str) -> String {
    format!(
        "{}/{}?loginuse={}&loginpas={}{}",
        settings.base_url(),
        endpoint,
        urlencoding::encode(&settings.login),
        urlencoding::encode(&settings.password),
        extra
    )
}

/// Epoch-millis plus a random offset. Defeats caching and request
/// deduplication by intermediate proxies.
fn cache_buster() -> String {
    let millis = chrono::Utc::now().timestamp_millis() as u64;
    let jitter: u32 = rand::random();
    format!("_t={}", millis.wrapping_add(u64::from(jitter)))
}

async fn send_command(client: &reqwest::Client, url: &str) -> Result<()> {
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Network(format!("camera returned {}", status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential_store::MemoryCredentialStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};

    const PARAMS_BODY: &str = "var vbright=64;\nvar vcontrast=3;\nvar ircut=0;\n";

    /// Minimal CGI stub. Reports each request line on a channel; delays
    /// decoder_control responses by `move_delay`.
    async fn stub_camera(move_delay: Duration) -> (u16, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = sock.read(&mut buf).await.unwrap_or(0);
                    let request_line = String::from_utf8_lossy(&buf[..n])
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    tx.send(request_line.clone()).ok();

                    if request_line.contains("decoder_control.cgi") {
                        sleep(move_delay).await;
                    }
                    let body = if request_line.contains("get_camera_params.cgi") {
                        PARAMS_BODY
                    } else {
                        "ok.\n"
                    };
                    let resp = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                });
            }
        });

        (port, rx)
    }

    fn client_for(port: u16) -> CameraCommandClient<MemoryCredentialStore> {
        let store = MemoryCredentialStore::with_settings(CameraSettings {
            host: "127.0.0.1".to_string(),
            port,
            login: "admin".to_string(),
            password: "pass".to_string(),
        });
        CameraCommandClient::new(Arc::new(store))
    }

    #[tokio::test]
    async fn rapid_direction_change_cancels_previous_move() {
        let (port, _requests) = stub_camera(Duration::from_millis(300)).await;
        let mut client = client_for(port);
        let mut outcomes = client.subscribe_outcomes();

        client.move_camera(MoveDirection::Left).await.unwrap();
        client.move_camera(MoveDirection::Right).await.unwrap();

        // exactly one command survives: the second
        let survivor = timeout(Duration::from_secs(2), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(survivor.direction, MoveDirection::Right);
        assert!(survivor.ok);

        assert!(
            timeout(Duration::from_millis(500), outcomes.recv())
                .await
                .is_err(),
            "superseded command must never report back"
        );
    }

    #[tokio::test]
    async fn stop_is_exempt_from_cancellation_bookkeeping() {
        let (port, mut requests) = stub_camera(Duration::from_millis(100)).await;
        let mut client = client_for(port);
        let mut outcomes = client.subscribe_outcomes();

        client.move_camera(MoveDirection::Left).await.unwrap();
        client.stop().await.unwrap();

        // the stop does not abort the move; it completes and reports
        let outcome = timeout(Duration::from_secs(2), outcomes.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.direction, MoveDirection::Left);
        assert!(outcome.ok);

        let mut seen = Vec::new();
        while let Ok(Some(line)) = timeout(Duration::from_millis(200), requests.recv()).await {
            seen.push(line);
        }
        assert!(seen.iter().any(|l| l.contains("command=4")));
        assert!(seen.iter().any(|l| l.contains("command=1")));
    }

    #[tokio::test]
    async fn change_setting_reconciles_from_device() {
        let (port, mut requests) = stub_camera(Duration::from_millis(0)).await;
        let client = client_for(port);

        let params = client
            .change_setting(SettingParam::Brightness, 64)
            .await
            .unwrap();
        assert_eq!(params.brightness(), Some(64));

        let control = timeout(Duration::from_secs(2), requests.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(control.contains("camera_control.cgi"));
        assert!(control.contains("param=1"));
        assert!(control.contains("value=64"));
        assert!(control.contains("_t="));
        assert!(control.contains("loginuse=admin"));

        let readback = timeout(Duration::from_secs(2), requests.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(readback.contains("get_camera_params.cgi"));
    }

    #[tokio::test]
    async fn missing_settings_is_a_validation_error() {
        let client = CameraCommandClient::new(Arc::new(MemoryCredentialStore::new()));
        assert!(matches!(
            client.move_camera(MoveDirection::Up).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(client.stream_url(), Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn stream_url_carries_credentials() {
        let client = client_for(81);
        let url = client.stream_url().unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:81/videostream.cgi?loginuse=admin&loginpas=pass"
        );
    }
}
