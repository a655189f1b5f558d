//! Collaborator seams between the sync engine and the remote services.
//!
//! The engine never talks HTTP itself. It consumes a [`SourcePlatform`] that
//! yields ordered track descriptors and a [`DestinationPlatform`] that
//! searches, lists and mutates playlists. The concrete implementations live
//! in [`crate::spotify`] and [`crate::youtube`]; tests plug in in-memory
//! fakes.
//!
//! Every remote failure is classified into a [`PlatformError`] at this
//! boundary, so callers branch on the kind instead of on message text.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::{
    PlaylistEntry, PlaylistRef, SourcePlaylist, SourcePlaylistSummary, Visibility,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("not authorized, run `tune2tube auth` again: {0}")]
    Unauthorized(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("remote call failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl PlatformError {
    pub fn is_quota(&self) -> bool {
        matches!(self, PlatformError::QuotaExceeded(_))
    }

    /// Classifies a non-success status with no structured reason attached.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::UNAUTHORIZED => PlatformError::Unauthorized(message),
            StatusCode::NOT_FOUND => PlatformError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => PlatformError::QuotaExceeded(message),
            _ => PlatformError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return PlatformError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => PlatformError::from_status(status, err.to_string()),
            None => PlatformError::Transport(err.to_string()),
        }
    }
}

#[async_trait]
pub trait SourcePlatform: Send + Sync {
    /// Returns the complete, ordered track list of a playlist.
    async fn get_playlist_tracks(&self, playlist_id: &str)
    -> Result<SourcePlaylist, PlatformError>;

    async fn list_playlists(&self) -> Result<Vec<SourcePlaylistSummary>, PlatformError>;
}

#[async_trait]
pub trait DestinationPlatform: Send + Sync {
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> Result<String, PlatformError>;

    /// Returns the first-ranked video for a free-text query, if any.
    async fn search_first_video(&self, query: &str) -> Result<Option<String>, PlatformError>;

    /// Appends a video and returns the handle of the new membership row.
    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<String, PlatformError>;

    async fn delete_playlist_item(&self, item_handle: &str) -> Result<(), PlatformError>;

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, PlatformError>;

    async fn find_playlist_by_name(&self, name: &str)
    -> Result<Option<PlaylistRef>, PlatformError>;
}
