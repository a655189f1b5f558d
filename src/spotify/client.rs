use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    config,
    http::send_with_retry,
    management::TokenManager,
    platform::{PlatformError, SourcePlatform},
    types::{
        SourcePlaylist, SourcePlaylistSummary, SpotifyPlaylistPage, SpotifyPlaylistResponse,
        SpotifyTrackItem, SpotifyTrackPage, TrackDescriptor,
    },
};

/// Pseudo playlist id for the user's saved ("liked") tracks.
pub const LIKED_SONGS_ID: &str = "current_user_saved_tracks";

/// Spotify Web API client implementing [`SourcePlatform`].
///
/// Holds the [`TokenManager`] behind a mutex so every request can refresh
/// the access token on demand without needing `&mut self`.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client against `SPOTIFY_API_URL` (the public API by
    /// default) using the stored Spotify token.
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: config::spotify_api_url(),
            tokens: Mutex::new(tokens),
        }
    }

    /// Performs an authorized GET and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Non-success statuses are classified through
    /// [`PlatformError::from_status`]. A body that does not match `T` gives
    /// [`PlatformError::Decode`].
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PlatformError> {
        let token = self.tokens.lock().await.get_valid_token().await;
        let response = send_with_retry(|| self.http.get(url).bearer_auth(&token)).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::from_status(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }

    /// Follows the `next` links of a track page until the last page and
    /// returns every playable track in playlist order.
    async fn collect_tracks(
        &self,
        first: SpotifyTrackPage,
    ) -> Result<Vec<TrackDescriptor>, PlatformError> {
        let mut tracks = to_descriptors(first.items);
        let mut next = first.next;

        while let Some(url) = next {
            let page: SpotifyTrackPage = self.get_json(&url).await?;
            tracks.extend(to_descriptors(page.items));
            next = page.next;
        }

        Ok(tracks)
    }

    /// Reads the user's saved tracks as a pseudo playlist named
    /// "Liked Songs", dated in its description.
    async fn liked_songs(&self) -> Result<SourcePlaylist, PlatformError> {
        let url = format!("{}/me/tracks?limit=50", self.api_url);
        let first: SpotifyTrackPage = self.get_json(&url).await?;
        let tracks = self.collect_tracks(first).await?;

        Ok(SourcePlaylist {
            name: "Liked Songs".to_string(),
            description: format!(
                "Spotify Liked Songs as of {}",
                Local::now().format("%Y-%m-%d")
            ),
            tracks,
        })
    }
}

/// Drops entries Spotify returns without a playable track (removed or local
/// files).
fn to_descriptors(items: Vec<SpotifyTrackItem>) -> Vec<TrackDescriptor> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .filter(|track| !track.name.trim().is_empty())
        .map(|track| {
            TrackDescriptor::new(
                track.name,
                track.artists.into_iter().map(|a| a.name).collect(),
            )
        })
        .collect()
}

#[async_trait]
impl SourcePlatform for SpotifyClient {
    /// Fetches name, description and all tracks of `playlist_id`.
    ///
    /// [`LIKED_SONGS_ID`] reads `/me/tracks` instead of a real playlist.
    ///
    /// # Errors
    ///
    /// [`PlatformError::NotFound`] for an unknown or inaccessible playlist,
    /// [`PlatformError::Unauthorized`] when the token was revoked.
    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
    ) -> Result<SourcePlaylist, PlatformError> {
        if playlist_id == LIKED_SONGS_ID {
            return self.liked_songs().await;
        }

        let url = format!(
            "{}/playlists/{}",
            self.api_url,
            urlencoding::encode(playlist_id)
        );
        let playlist: SpotifyPlaylistResponse = self.get_json(&url).await?;
        let tracks = self.collect_tracks(playlist.tracks).await?;

        Ok(SourcePlaylist {
            name: playlist.name,
            description: playlist.description.unwrap_or_default(),
            tracks,
        })
    }

    /// Lists every playlist the user owns or follows, 50 per page.
    async fn list_playlists(&self) -> Result<Vec<SourcePlaylistSummary>, PlatformError> {
        let mut playlists = Vec::new();
        let mut next = Some(format!("{}/me/playlists?limit=50", self.api_url));

        while let Some(url) = next {
            let page: SpotifyPlaylistPage = self.get_json(&url).await?;
            playlists.extend(page.items.into_iter().map(|p| SourcePlaylistSummary {
                id: p.id,
                name: p.name,
                total_tracks: p.tracks.map_or(0, |t| t.total),
            }));
            next = page.next;
        }

        Ok(playlists)
    }
}
