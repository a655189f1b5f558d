use tune2tube::types::SourcePlaylistSummary;
use tune2tube::utils::*;

fn summary(id: &str, name: &str) -> SourcePlaylistSummary {
    SourcePlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        total_tracks: 0,
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let challenge = generate_code_challenge("test_verifier_123");

    assert_eq!(challenge, generate_code_challenge("test_verifier_123"));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 is 32 bytes, 43 chars unpadded
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_playlist_link() {
    assert_eq!(
        playlist_link("PLabc123"),
        "https://www.youtube.com/playlist?list=PLabc123"
    );
}

#[test]
fn test_pick_override() {
    assert_eq!(pick_override(Some("Mine".to_string()), "Theirs"), "Mine");
    assert_eq!(pick_override(None, "Theirs"), "Theirs");
    // blank overrides fall back
    assert_eq!(pick_override(Some("   ".to_string()), "Theirs"), "Theirs");
}

#[test]
fn test_sort_playlist_summaries() {
    let mut playlists = vec![
        summary("3", "road trip"),
        summary("1", "Chill"),
        summary("4", "Road Trip"),
        summary("2", "ambient"),
    ];

    sort_playlist_summaries(&mut playlists);

    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "3", "4"]);
}

#[test]
fn test_sort_empty_playlist_summaries() {
    let mut playlists: Vec<SourcePlaylistSummary> = Vec::new();
    sort_playlist_summaries(&mut playlists);
    assert!(playlists.is_empty());
}

#[test]
fn test_liked_songs_title() {
    assert_eq!(liked_songs_title("Sam"), "Sam's Spotify Liked Songs");
    assert_eq!(liked_songs_title("  Sam "), "Sam's Spotify Liked Songs");
}
