use tabled::Table;

use crate::{
    error,
    oauth::OAuthProvider,
    platform::SourcePlatform,
    spotify::{LIKED_SONGS_ID, SpotifyClient},
    types::PlaylistTableRow,
    utils, warning,
};

use super::load_tokens;

pub async fn playlists(search: Option<String>) {
    let spotify = SpotifyClient::new(load_tokens(OAuthProvider::Spotify).await);

    let mut playlists = match spotify.list_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to fetch Spotify playlists: {}", e),
    };
    utils::sort_playlist_summaries(&mut playlists);

    // liked songs are not a real playlist but can be migrated like one
    let mut rows = vec![PlaylistTableRow {
        name: "Liked Songs".to_string(),
        id: LIKED_SONGS_ID.to_string(),
        tracks: "-".to_string(),
    }];
    rows.extend(playlists.into_iter().map(|p| PlaylistTableRow {
        name: p.name,
        id: p.id,
        tracks: p.total_tracks.to_string(),
    }));

    if let Some(search) = search {
        let term = search.to_lowercase();
        rows.retain(|r| r.name.to_lowercase().contains(&term));
    }

    if rows.is_empty() {
        warning!("No playlists found.");
        return;
    }

    println!("{}", Table::new(rows));
}
