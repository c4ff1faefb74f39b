use crate::core::config::DelugeConfig;
use crate::core::error::DelugeError;
use crate::deluge::models::{snapshot_from_raw, RpcRequest, RpcResponse, UiState};
use crate::models::torrent::TorrentRecord;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Torrent fields requested from `web.update_ui`
pub const SNAPSHOT_FIELDS: [&str; 5] = [
    "name",
    "progress",
    "time_added",
    "seeding_time",
    "trackers",
];

/// Client for the Deluge Web UI `/json` endpoint.
///
/// Covers both halves of a run: fetching the torrent snapshot and issuing
/// removals. Authentication is a password-only `auth.login` call; the Web
/// UI hands back a `_session_id` cookie which is replayed on every
/// subsequent request.
pub struct DelugeClient {
    client: reqwest::Client,
    base_url: String,
    password: String,
    remove_data: bool,
    session: Mutex<Option<String>>,
    next_id: AtomicU64,
}

impl DelugeClient {
    pub fn new(config: &DelugeConfig) -> Result<Self, DelugeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            password: config.password.clone(),
            remove_data: config.remove_data,
            session: Mutex::new(None),
            next_id: AtomicU64::new(1),
        })
    }

    /// Authenticate against the Web UI
    ///
    /// A `false` result means the password was rejected, which is distinct
    /// from the endpoint being unreachable.
    pub async fn login(&self) -> Result<(), DelugeError> {
        let accepted: bool = self
            .call("auth.login", json!([self.password]))
            .await?
            .unwrap_or(false);

        if !accepted {
            return Err(DelugeError::AuthRejected);
        }
        Ok(())
    }

    /// Fetch the current torrent snapshot, keyed by lowercased info hash
    pub async fn fetch_snapshot(&self) -> Result<HashMap<String, TorrentRecord>, DelugeError> {
        let ui: UiState = self
            .call("web.update_ui", json!([SNAPSHOT_FIELDS, {}]))
            .await?
            .ok_or_else(|| {
                DelugeError::UnexpectedResponse("web.update_ui returned no result".to_string())
            })?;

        if !ui.connected {
            return Err(DelugeError::Daemon(
                "Web UI is not connected to a daemon".to_string(),
            ));
        }

        Ok(snapshot_from_raw(ui.torrents.unwrap_or_default()))
    }

    /// Remove a torrent (and, if configured, its data) from the daemon
    pub async fn remove_torrent(&self, id: &str) -> Result<(), DelugeError> {
        let result: Option<bool> = self
            .call("core.remove_torrent", json!([id, self.remove_data]))
            .await?;

        // Deluge 2 answers true on success; older daemons answer null
        if result == Some(false) {
            return Err(DelugeError::Daemon(format!(
                "daemon refused to remove torrent {}",
                id
            )));
        }
        Ok(())
    }

    /// Issue one JSON request and decode the result.
    ///
    /// Returns `Ok(None)` when the daemon answers with a null result, which
    /// some methods legitimately do.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, DelugeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest { method, params, id };

        let mut request = self
            .client
            .post(format!("{}/json", self.base_url))
            .json(&body);

        if let Some(cookie) = self.session_cookie() {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DelugeError::UnexpectedResponse(format!(
                "HTTP status {} from {}",
                status, method
            )));
        }

        self.capture_session(&response);

        let decoded: RpcResponse<T> = response.json().await?;

        if let Some(error) = decoded.error {
            return Err(DelugeError::Daemon(error.describe()));
        }

        Ok(decoded.result)
    }

    fn session_cookie(&self) -> Option<String> {
        self.session.lock().expect("session lock poisoned").clone()
    }

    /// Retain the `_session_id` cookie handed out after `auth.login`
    fn capture_session(&self, response: &reqwest::Response) {
        for value in response.headers().get_all(reqwest::header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let Some(pair) = raw.split(';').next() else { continue };
            let pair = pair.trim();
            if pair.starts_with("_session_id=") {
                *self.session.lock().expect("session lock poisoned") = Some(pair.to_string());
            }
        }
    }
}

impl crate::retention::executor::Remove for DelugeClient {
    async fn remove(&self, id: &str) -> Result<(), DelugeError> {
        self.remove_torrent(id).await
    }
}
