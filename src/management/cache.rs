use std::{collections::BTreeMap, path::PathBuf};

use super::store::{self, StoreError};

pub struct MatchCache {
    path: PathBuf,
    matches: BTreeMap<String, Option<String>>,
    dirty: bool,
}

impl MatchCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            matches: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Loads the cache at `path`, starting empty when nothing was stored yet.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let matches = match store::read_json(&path).await {
            Ok(matches) => matches,
            Err(StoreError::NotFound(_)) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            matches,
            dirty: false,
        })
    }

    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(Self::default_path()).await
    }

    pub async fn persist(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        store::write_json(&self.path, &self.matches).await?;
        self.dirty = false;
        Ok(())
    }

    /// `None` means the query was never searched, `Some(None)` means it was
    /// searched and nothing matched.
    pub fn get(&self, query: &str) -> Option<Option<&str>> {
        self.matches.get(query).map(|v| v.as_deref())
    }

    pub fn contains(&self, query: &str) -> bool {
        self.matches.contains_key(query)
    }

    /// Records a search result unless the query is already known. Returns
    /// whether the entry was new.
    pub fn insert(&mut self, query: String, video_id: Option<String>) -> bool {
        if self.matches.contains_key(&query) {
            return false;
        }
        self.matches.insert(query, video_id);
        self.dirty = true;
        true
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn default_path() -> PathBuf {
        let mut path = store::data_dir();
        path.push("cache/matches.json");
        path
    }
}
