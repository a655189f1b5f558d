use std::path::PathBuf;

use super::store::{self, StoreError};
use crate::types::SyncEntry;

pub struct SyncListManager {
    path: PathBuf,
    entries: Vec<SyncEntry>,
}

impl SyncListManager {
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let entries = match store::read_json(&path).await {
            Ok(entries) => entries,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, entries })
    }

    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(Self::default_path()).await
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        store::write_json(&self.path, &self.entries).await
    }

    /// Adds a pairing, replacing an older one for the same source playlist.
    pub fn upsert(&mut self, entry: SyncEntry) -> &mut Self {
        match self
            .entries
            .iter_mut()
            .find(|e| e.source_playlist_id == entry.source_playlist_id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn get(&self, source_playlist_id: &str) -> Option<&SyncEntry> {
        self.entries
            .iter()
            .find(|e| e.source_playlist_id == source_playlist_id)
    }

    pub fn all(&self) -> &[SyncEntry] {
        &self.entries
    }

    pub fn default_path() -> PathBuf {
        let mut path = store::data_dir();
        path.push("sync.json");
        path
    }
}
