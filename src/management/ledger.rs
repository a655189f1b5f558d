use std::path::PathBuf;

use super::store::{self, StoreError};
use crate::types::ResumeState;

pub struct ResumeLedger {
    path: PathBuf,
}

impl ResumeLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Replaces whatever was recorded before. Returns once the document is
    /// flushed to disk.
    pub async fn save(&self, state: &ResumeState) -> Result<(), StoreError> {
        store::write_json(&self.path, state).await
    }

    pub async fn load(&self) -> Result<Option<ResumeState>, StoreError> {
        match store::read_json(&self.path).await {
            Ok(state) => Ok(Some(state)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        store::remove(&self.path).await
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        let mut path = store::data_dir();
        path.push("state/resume.json");
        path
    }
}
