use std::path::{Path, PathBuf};

use super::store::{self, StoreError};
use crate::types::SourcePlaylist;

/// Writes the fetched tracks of `playlist` as pretty JSON.
pub async fn export_playlist(path: &Path, playlist: &SourcePlaylist) -> Result<(), StoreError> {
    store::write_json(path, playlist).await
}

/// `<data_local_dir>/tune2tube/exports/saved_tracks_{user}.json`, with path
/// separators in `user` replaced.
pub fn default_export_path(user: &str) -> PathBuf {
    let mut path = store::data_dir();
    path.push("exports");
    path.push(format!(
        "saved_tracks_{}.json",
        user.trim().replace(['/', '\\'], "_")
    ));
    path
}
