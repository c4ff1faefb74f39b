use crate::models::torrent::TorrentRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for the Web UI `/json` endpoint
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
    #[allow(dead_code)]
    pub id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

impl RpcError {
    /// Error text for logs and summaries, with the daemon's code when set
    pub fn describe(&self) -> String {
        if self.code != 0 {
            format!("{} (code {})", self.message, self.code)
        } else {
            self.message.clone()
        }
    }
}

/// `web.update_ui` result payload, reduced to what the sweeper reads
#[derive(Debug, Deserialize)]
pub struct UiState {
    #[serde(default = "default_connected")]
    pub connected: bool,
    #[serde(default)]
    pub torrents: Option<HashMap<String, RawTorrent>>,
}

fn default_connected() -> bool {
    true
}

/// Per-torrent fields as the daemon reports them.
///
/// Every field is defaulted: a torrent missing a field is treated as having
/// the zero/empty value, never as a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct RawTorrent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub time_added: f64,
    #[serde(default)]
    pub seeding_time: f64,
    #[serde(default)]
    pub trackers: Vec<RawTracker>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTracker {
    #[serde(default)]
    pub url: String,
}

/// Convert the raw `web.update_ui` torrent map into snapshot records.
///
/// Hash keys arrive in whatever casing the daemon uses; they are lowercased
/// here so the rest of the program sees one canonical identifier form.
pub fn snapshot_from_raw(raw: HashMap<String, RawTorrent>) -> HashMap<String, TorrentRecord> {
    raw.into_iter()
        .map(|(hash, torrent)| {
            let id = hash.to_lowercase();
            let name = if torrent.name.is_empty() {
                "Unknown".to_string()
            } else {
                torrent.name
            };
            let trackers = torrent
                .trackers
                .into_iter()
                .map(|t| t.url)
                .filter(|url| !url.is_empty())
                .collect();

            let record = TorrentRecord {
                id: id.clone(),
                name,
                progress: torrent.progress,
                time_added: torrent.time_added as i64,
                seeding_time: torrent.seeding_time as i64,
                trackers,
            };
            (id, record)
        })
        .collect()
}
