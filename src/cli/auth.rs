use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, oauth, oauth::OAuthProvider, types::PkceToken};

pub async fn auth(provider: OAuthProvider) {
    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
    if let Err(e) = oauth::auth(provider, shared_state).await {
        error!("{}", e);
    }
}
