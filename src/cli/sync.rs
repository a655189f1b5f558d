use crate::{
    error, info,
    management::{ResumeLedger, SyncListManager},
    oauth::OAuthProvider,
    platform::SourcePlatform,
    spotify::SpotifyClient,
    sync::{Interrupt, SyncEngine, SyncTarget},
    types::SyncEntry,
    warning,
    youtube::YoutubeClient,
};

use super::{load_tokens, open_cache, report_outcome, request_delay, warn_pending_ledger};

pub async fn sync(source_playlist_id: Option<String>, quiet: bool) {
    let delay = request_delay();

    let list = match SyncListManager::load_default().await {
        Ok(list) => list,
        Err(e) => error!("Failed to load sync list: {}", e),
    };
    let entries: Vec<SyncEntry> = match &source_playlist_id {
        Some(id) => match list.get(id) {
            Some(entry) => vec![entry.clone()],
            None => error!(
                "Playlist {} is not in the sync list. Run tune2tube create {} --save-to-sync first.",
                id, id
            ),
        },
        None => list.all().to_vec(),
    };

    if entries.is_empty() {
        warning!("No playlists saved for sync. Use tune2tube create <id> --save-to-sync.");
        return;
    }

    let spotify = SpotifyClient::new(load_tokens(OAuthProvider::Spotify).await);
    let youtube = YoutubeClient::new(load_tokens(OAuthProvider::Youtube).await);
    let ledger = ResumeLedger::at_default_path();
    if !quiet {
        warn_pending_ledger(&ledger).await;
    }

    let interrupt = Interrupt::new();
    interrupt.watch_ctrl_c();
    let mut engine =
        SyncEngine::new(&youtube, open_cache().await, &ledger, delay, interrupt).quiet(quiet);

    for entry in entries {
        if !quiet {
            info!("Syncing \"{}\"", entry.name);
        }

        let source = match spotify.get_playlist_tracks(&entry.source_playlist_id).await {
            Ok(source) => source,
            Err(e) => {
                warning!(
                    "Skipping \"{}\", failed to read Spotify playlist: {}",
                    entry.name,
                    e
                );
                continue;
            }
        };

        let target = SyncTarget {
            playlist_id: entry.target_playlist_id.clone(),
            name: entry.name.clone(),
            description: source.description.clone(),
        };

        match engine.run(&target, &source.queries(), true).await {
            Ok(outcome) => {
                report_outcome(&outcome, quiet);
                // the ledger only holds one run, and a quota halt would fail the rest anyway
                if !outcome.is_completed() {
                    break;
                }
            }
            Err(e) => error!("Sync of \"{}\" failed: {}", entry.name, e),
        }
    }
}
