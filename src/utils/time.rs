use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time is before Unix epoch")
        .as_secs() as i64
}

/// Seconds elapsed since `added`, clamped to zero.
///
/// A timestamp in the future (daemon clock ahead of ours) must read as age
/// zero, never as a negative age or an error.
pub fn clamped_age(added: i64, now: i64) -> i64 {
    (now - added).max(0)
}
