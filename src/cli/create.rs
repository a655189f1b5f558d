use crate::{
    error, info,
    management::{self, ResumeLedger, SyncListManager},
    oauth::OAuthProvider,
    platform::SourcePlatform,
    spotify::{LIKED_SONGS_ID, SpotifyClient},
    success,
    sync::{Interrupt, SyncEngine, SyncTarget},
    types::{SourcePlaylist, SyncEntry, Visibility},
    utils, warning,
    youtube::YoutubeClient,
};

use super::{load_tokens, open_cache, report_outcome, request_delay, warn_pending_ledger};

#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub source_playlist_id: String,
    pub visibility: Visibility,
    pub name: Option<String>,
    pub description: Option<String>,
    pub only_link: bool,
    pub save_to_sync: bool,
    /// Owner label for a Liked Songs export.
    pub user: Option<String>,
}

pub async fn create(opts: CreateOptions) {
    let quiet = opts.only_link;
    let delay = request_delay();
    let spotify = SpotifyClient::new(load_tokens(OAuthProvider::Spotify).await);
    let youtube = YoutubeClient::new(load_tokens(OAuthProvider::Youtube).await);

    let source = match spotify.get_playlist_tracks(&opts.source_playlist_id).await {
        Ok(source) => source,
        Err(e) => error!(
            "Failed to read Spotify playlist {}: {}",
            opts.source_playlist_id, e
        ),
    };
    if !quiet {
        info!("Found {} tracks in \"{}\"", source.tracks.len(), source.name);
    }

    let mut source_name = source.name.clone();
    if let Some(user) = opts.user.as_deref().filter(|u| !u.trim().is_empty()) {
        if opts.source_playlist_id == LIKED_SONGS_ID {
            source_name = utils::liked_songs_title(user);
            let path = management::default_export_path(user);
            let export = SourcePlaylist {
                name: source_name.clone(),
                ..source.clone()
            };
            match management::export_playlist(&path, &export).await {
                Ok(()) if !quiet => success!("Saved track list to {}", path.display()),
                Ok(()) => {}
                Err(e) => warning!("Failed to export track list: {}", e),
            }
        } else {
            warning!("--user only applies to {}, ignoring it", LIKED_SONGS_ID);
        }
    }

    let name = utils::pick_override(opts.name, &source_name);
    let description = utils::pick_override(opts.description, &source.description);

    let ledger = ResumeLedger::at_default_path();
    if !quiet {
        warn_pending_ledger(&ledger).await;
    }

    let interrupt = Interrupt::new();
    interrupt.watch_ctrl_c();
    let mut engine =
        SyncEngine::new(&youtube, open_cache().await, &ledger, delay, interrupt).quiet(quiet);

    let (playlist_id, created) = match engine
        .ensure_playlist(&name, &description, opts.visibility)
        .await
    {
        Ok(result) => result,
        Err(e) => error!("Failed to create YouTube playlist \"{}\": {}", name, e),
    };
    if !quiet {
        if created {
            success!("Created {} YouTube playlist \"{}\"", opts.visibility, name);
        } else {
            info!("YouTube playlist \"{}\" already exists, adding missing tracks", name);
        }
    }

    if opts.save_to_sync {
        match SyncListManager::load_default().await {
            Ok(mut list) => {
                list.upsert(SyncEntry {
                    source_playlist_id: opts.source_playlist_id.clone(),
                    target_playlist_id: playlist_id.clone(),
                    name: name.clone(),
                });
                match list.persist().await {
                    Ok(()) if !quiet => success!("Saved \"{}\" to the sync list", name),
                    Ok(()) => {}
                    Err(e) => warning!("Failed to save sync list: {}", e),
                }
            }
            Err(e) => warning!("Failed to load sync list: {}", e),
        }
    }

    let target = SyncTarget {
        playlist_id,
        name,
        description,
    };

    match engine.run(&target, &source.queries(), false).await {
        Ok(outcome) => report_outcome(&outcome, quiet),
        Err(e) => error!("Sync of \"{}\" failed: {}", target.name, e),
    }
}
