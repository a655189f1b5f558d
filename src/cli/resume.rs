use crate::{
    error, info,
    management::ResumeLedger,
    oauth::OAuthProvider,
    sync::{Interrupt, SyncEngine},
    youtube::YoutubeClient,
};

use super::{load_tokens, open_cache, report_outcome, request_delay};

pub async fn resume(quiet: bool) {
    let delay = request_delay();
    let youtube = YoutubeClient::new(load_tokens(OAuthProvider::Youtube).await);
    let ledger = ResumeLedger::at_default_path();

    let interrupt = Interrupt::new();
    interrupt.watch_ctrl_c();
    let mut engine =
        SyncEngine::new(&youtube, open_cache().await, &ledger, delay, interrupt).quiet(quiet);

    match engine.resume().await {
        Ok(None) => info!("Nothing to resume."),
        Ok(Some(outcome)) => report_outcome(&outcome, quiet),
        Err(e) => error!(
            "Resume failed: {}\nThe saved progress in {} is untouched.",
            e,
            ledger.path().display()
        ),
    }
}
