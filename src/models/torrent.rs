/// Point-in-time view of a single torrent as reported by the daemon.
///
/// Built once per run at the client boundary and owned by the job runner
/// for the duration of that run. Missing fields in the daemon's response
/// default to zero/empty here rather than failing the snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct TorrentRecord {
    /// Lowercased info hash, used as the canonical identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Completion percentage, 0.0–100.0
    pub progress: f64,
    /// Unix timestamp the torrent was added to the daemon
    pub time_added: i64,
    /// Cumulative seconds spent actively seeding
    pub seeding_time: i64,
    /// Announce URLs, may be empty
    pub trackers: Vec<String>,
}

impl TorrentRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into().to_lowercase(),
            name: name.into(),
            progress: 0.0,
            time_added: 0,
            seeding_time: 0,
            trackers: Vec::new(),
        }
    }
}
