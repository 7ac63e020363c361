use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::warn;

use crate::models::{Contact, Country, Task};

/// The last successfully fetched, unfiltered lists, kept so the tool can
/// still show something when the backend is unreachable. The backend stays
/// the owner of all data; this file is never written back to it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Snapshot {
    /// When the newest part of the snapshot was fetched (ISO 8601).
    #[serde(default)]
    pub fetched_at: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub countries: Vec<Country>,
}

impl Snapshot {
    /// Human-readable fetch time for stale-data warnings.
    pub fn fetched_label(&self) -> &str {
        self.fetched_at.as_deref().unwrap_or("an unknown time")
    }
}

/// Returns the path to the snapshot file (`snapshot.json`).
///
/// The path is determined in the following order:
/// 1. `LEADBOARD_SNAPSHOT` environment variable.
/// 2. `~/.local/share/leadboard/snapshot.json` (on Linux).
/// 3. `./snapshot.json` (fallback).
fn snapshot_path() -> PathBuf {
    std::env::var("LEADBOARD_SNAPSHOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("leadboard");
            if !p.exists() {
                let _ = fs::create_dir_all(&p);
            }
            p.push("snapshot.json");
            p
        })
}

/// Loads the snapshot from disk.
///
/// Returns an empty snapshot if the file does not exist or cannot be read.
pub fn load_snapshot() -> Snapshot {
    let path = snapshot_path();
    if !path.exists() {
        return Snapshot::default();
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(_) => return Snapshot::default(),
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return Snapshot::default();
    }
    serde_json::from_str(&s).unwrap_or_default()
}

/// Saves the snapshot, overwriting the existing file.
pub fn save_snapshot(snapshot: &Snapshot) -> io::Result<()> {
    let path = snapshot_path();
    let s = serde_json::to_string_pretty(snapshot)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Replaces the cached task list and bumps the fetch timestamp.
pub fn remember_tasks(tasks: &[Task]) {
    let mut snapshot = load_snapshot();
    snapshot.tasks = tasks.to_vec();
    snapshot.fetched_at = Some(Utc::now().to_rfc3339());
    if let Err(e) = save_snapshot(&snapshot) {
        warn!("could not write snapshot: {}", e);
    }
}

/// Replaces the cached contact list and bumps the fetch timestamp.
pub fn remember_contacts(contacts: &[Contact]) {
    let mut snapshot = load_snapshot();
    snapshot.contacts = contacts.to_vec();
    snapshot.fetched_at = Some(Utc::now().to_rfc3339());
    if let Err(e) = save_snapshot(&snapshot) {
        warn!("could not write snapshot: {}", e);
    }
}

/// Replaces the cached country list and bumps the fetch timestamp.
pub fn remember_countries(countries: &[Country]) {
    let mut snapshot = load_snapshot();
    snapshot.countries = countries.to_vec();
    snapshot.fetched_at = Some(Utc::now().to_rfc3339());
    if let Err(e) = save_snapshot(&snapshot) {
        warn!("could not write snapshot: {}", e);
    }
}

/// Deletes the snapshot file.
pub fn delete_snapshot() -> io::Result<()> {
    let path = snapshot_path();
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
