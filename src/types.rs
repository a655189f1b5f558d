use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A song as the source platform describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    pub artists: Vec<String>,
}

impl TrackDescriptor {
    pub fn new(title: impl Into<String>, artists: Vec<String>) -> Self {
        Self {
            title: title.into(),
            artists,
        }
    }

    /// Normalized search text, e.g. `"Song X by Artist Y, Artist Z"`.
    pub fn query(&self) -> String {
        format!("{} by {}", self.title, self.artists.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub query: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub item_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSnapshot {
    pub id: String,
    pub name: String,
    pub description: String,
    pub items: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    pub target_playlist_id: String,
    pub pending_queries: Vec<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourcePlaylist {
    pub name: String,
    pub description: String,
    pub tracks: Vec<TrackDescriptor>,
}

impl SourcePlaylist {
    pub fn queries(&self) -> Vec<String> {
        self.tracks.iter().map(TrackDescriptor::query).collect()
    }
}

#[derive(Debug, Clone)]
pub struct SourcePlaylistSummary {
    pub id: String,
    pub name: String,
    pub total_tracks: u64,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub id: String,
    pub tracks: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    /// `--private` wins when both flags are set, and so does no flag at all.
    pub fn from_flags(public: bool, private: bool) -> Self {
        if public && !private {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntry {
    pub source_playlist_id: String,
    pub target_playlist_id: String,
    pub name: String,
}

// Spotify payloads

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistResponse {
    pub name: String,
    pub description: Option<String>,
    pub tracks: SpotifyTrackPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrackPage {
    pub items: Vec<SpotifyTrackItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrackItem {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistPage {
    pub items: Vec<SpotifyPlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylistItem {
    pub id: String,
    pub name: String,
    pub tracks: Option<SpotifyTracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTracksRef {
    pub total: u64,
}

// YouTube payloads

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub snippet: PlaylistSnippetBody,
    pub status: PlaylistStatusBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnippetBody {
    pub title: String,
    pub description: String,
    pub default_language: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStatusBody {
    pub privacy_status: Visibility,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPlaylistItemRequest {
    pub snippet: PlaylistItemSnippetBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippetBody {
    pub playlist_id: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub kind: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeResource {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    pub items: Vec<PlaylistItemResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemResource {
    pub id: String,
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListResponse {
    pub items: Vec<PlaylistResource>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResource {
    pub id: String,
    pub snippet: PlaylistResourceSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResourceSnippet {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorDetail {
    pub reason: String,
}
