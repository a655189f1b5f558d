use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::SourcePlaylistSummary;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn playlist_link(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={}", playlist_id)
}

/// Playlist name for someone else's Liked Songs, e.g. "Sam's Spotify Liked
/// Songs".
pub fn liked_songs_title(user: &str) -> String {
    format!("{}'s Spotify Liked Songs", user.trim())
}

/// Picks the explicit override when given, the source value otherwise.
pub fn pick_override(explicit: Option<String>, fallback: &str) -> String {
    match explicit {
        Some(value) if !value.trim().is_empty() => value,
        _ => fallback.to_string(),
    }
}

pub fn sort_playlist_summaries(playlists: &mut [SourcePlaylistSummary]) {
    playlists.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}
