use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    oauth::{self, OAuthProvider},
    types::PkceToken,
    warning,
};

#[derive(Clone)]
pub struct CallbackState {
    pub provider: OAuthProvider,
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

/// Completes the PKCE flow: trades the `code` query parameter plus the stored
/// verifier for a token and parks it in the shared state.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        warning!("Authorization was denied: {}", error);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut pkce = state.pkce.lock().await;
    let Some(pkce_state) = pkce.as_mut() else {
        return Html("<h4>Missing PKCE code verifier.</h4>");
    };

    let verifier = pkce_state.code_verifier.clone();

    match oauth::exchange_code_pkce(state.provider, code, &verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
