//! # Spotify source client
//!
//! Reads playlists from the Spotify Web API and hands them to the sync engine
//! as ordered [`TrackDescriptor`](crate::types::TrackDescriptor) lists.
//!
//! ## Endpoints
//!
//! - `GET /playlists/{id}` for playlist name, description and the first page
//!   of tracks, followed by the `next` links until exhausted
//! - `GET /me/tracks` for the Liked Songs pseudo playlist
//!   ([`LIKED_SONGS_ID`])
//! - `GET /me/playlists` for the playlist listing
//!
//! ## Error handling
//!
//! Requests go through [`crate::http::send_with_retry`], which retries 502
//! Bad Gateway and honours `Retry-After` on 429. Remaining failures become a
//! classified [`PlatformError`](crate::platform::PlatformError).
//!
//! Tracks without a name, such as removed songs or local files, are skipped.

mod client;

pub use client::LIKED_SONGS_ID;
pub use client::SpotifyClient;
