//! # CLI Module
//!
//! User-facing commands of tune2tube. Each command wires the remote clients,
//! the on-disk stores and the [`SyncEngine`](crate::sync::SyncEngine)
//! together and turns the outcome into console output.
//!
//! ## Commands
//!
//! - [`auth`] authorizes against Spotify or YouTube (OAuth 2.0 PKCE)
//! - [`create`] builds a YouTube playlist from a Spotify playlist
//! - [`resume`] continues a run that stopped on quota exhaustion, an error
//!   or Ctrl-C
//! - [`sync`] reconciles playlists saved with `create --save-to-sync`
//! - [`playlists`] lists the Spotify playlists that can be migrated
//!
//! ## Failure handling
//!
//! Configuration and credential problems are fatal and reported through
//! [`error!`](crate::error) before any remote call is made. A halted sync is
//! not fatal. The remaining work is already in the resume ledger when the
//! command reports where it stopped.

mod auth;
mod create;
mod playlists;
mod resume;
mod sync;

use std::time::Duration;

pub use auth::auth;
pub use create::{CreateOptions, create};
pub use playlists::playlists;
pub use resume::resume;
pub use sync::sync;

use crate::{
    config, error, info,
    management::{MatchCache, ResumeLedger, TokenManager},
    oauth::OAuthProvider,
    platform::PlatformError,
    success,
    sync::{HaltReason, SyncOutcome},
    utils, warning,
};

pub(crate) async fn load_tokens(provider: OAuthProvider) -> TokenManager {
    if let Err(e) = provider.validate() {
        error!("{}", e);
    }
    match TokenManager::load(provider).await {
        Ok(t) => t,
        Err(e) => error!(
            "Failed to load {provider} token. Please run tune2tube auth {provider}\n Error: {}",
            e
        ),
    }
}

pub(crate) fn request_delay() -> Duration {
    match config::request_delay() {
        Ok(delay) => delay,
        Err(e) => error!("{}", e),
    }
}

pub(crate) async fn open_cache() -> MatchCache {
    match MatchCache::load_default().await {
        Ok(cache) => cache,
        Err(e) => {
            warning!("Failed to load match cache, starting empty. Err: {}", e);
            MatchCache::new(MatchCache::default_path())
        }
    }
}

/// Warns when a ledger with unfinished work would be replaced by a new halt.
pub(crate) async fn warn_pending_ledger(ledger: &ResumeLedger) {
    if let Ok(Some(state)) = ledger.load().await {
        if !state.pending_queries.is_empty() {
            warning!(
                "A previous run of \"{}\" still has {} tracks pending. Run tune2tube resume to finish it; \
                 it is replaced if this run stops early.",
                state.name,
                state.pending_queries.len()
            );
        }
    }
}

pub(crate) fn report_outcome(outcome: &SyncOutcome, quiet: bool) {
    let report = outcome.report();

    if !quiet {
        for query in &report.unresolved {
            warning!("No video found for {}", query);
        }
        for (handle, e) in &report.remove_failures {
            warning!("Could not remove playlist item {}: {}", handle, e);
        }
    }
    if report.stale_kept > 0 {
        warning!(
            "Kept {} stale playlist items because some searches failed. Run tune2tube sync again to remove them.",
            report.stale_kept
        );
    }

    match outcome {
        SyncOutcome::Completed(report) => {
            if !quiet {
                success!(
                    "Playlist up to date: {} added, {} removed, {} without a match.",
                    report.added.len(),
                    report.removed.len(),
                    report.unresolved.len()
                );
            }
        }
        SyncOutcome::Halted { report, halt } => {
            match &halt.reason {
                HaltReason::Failed(PlatformError::QuotaExceeded(msg)) => warning!(
                    "YouTube quota exhausted while adding \"{}\" ({}).",
                    halt.stopped_at,
                    msg
                ),
                HaltReason::Failed(e) => {
                    warning!("Stopped while adding \"{}\": {}", halt.stopped_at, e)
                }
                HaltReason::Interrupted => {
                    warning!("Interrupted, stopped at \"{}\".", halt.stopped_at)
                }
            }
            info!(
                "{} videos were added before stopping. Progress saved: {} tracks remaining.",
                report.added.len(),
                halt.pending.len()
            );
            info!("Run tune2tube resume later to continue.");
        }
    }

    if quiet {
        println!("{}", utils::playlist_link(&report.playlist_id));
    } else {
        info!("Playlist: {}", utils::playlist_link(&report.playlist_id));
    }
}
