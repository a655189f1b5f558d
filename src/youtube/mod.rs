//! # YouTube destination client
//!
//! Implements [`DestinationPlatform`](crate::platform::DestinationPlatform)
//! over the YouTube Data API v3. Playlist membership is addressed by
//! playlist item ids, which the sync engine carries as item handles.
//!
//! Google reports quota exhaustion as a 403 with a structured
//! `quotaExceeded` reason. [`classify_google_error`] turns that into
//! [`PlatformError::QuotaExceeded`](crate::platform::PlatformError::QuotaExceeded)
//! so the executor can halt and the engine can save the resume ledger.

mod client;

pub use client::YoutubeClient;
pub use client::classify_google_error;
