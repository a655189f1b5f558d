use std::{fmt, sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::{self, ConfigError},
    management::TokenManager,
    server::start_api_server,
    success,
    types::{PkceToken, Token},
    utils, warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OAuthProvider {
    Spotify,
    Youtube,
}

impl OAuthProvider {
    pub fn client_id(&self) -> Result<String, ConfigError> {
        match self {
            OAuthProvider::Spotify => config::spotify_client_id(),
            OAuthProvider::Youtube => config::youtube_client_id(),
        }
    }

    /// Spotify's PKCE flow is secretless, Google's is not.
    pub fn client_secret(&self) -> Result<Option<String>, ConfigError> {
        match self {
            OAuthProvider::Spotify => Ok(None),
            OAuthProvider::Youtube => config::youtube_client_secret().map(Some),
        }
    }

    pub fn redirect_uri(&self) -> Result<String, ConfigError> {
        match self {
            OAuthProvider::Spotify => config::spotify_redirect_uri(),
            OAuthProvider::Youtube => config::youtube_redirect_uri(),
        }
    }

    pub fn scope(&self) -> String {
        match self {
            OAuthProvider::Spotify => config::spotify_scope(),
            OAuthProvider::Youtube => config::youtube_scope(),
        }
    }

    pub fn auth_url(&self) -> String {
        match self {
            OAuthProvider::Spotify => config::spotify_auth_url(),
            OAuthProvider::Youtube => config::google_auth_url(),
        }
    }

    pub fn token_url(&self) -> String {
        match self {
            OAuthProvider::Spotify => config::spotify_token_url(),
            OAuthProvider::Youtube => config::google_token_url(),
        }
    }

    /// Checks every credential the provider needs without touching the
    /// network.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client_id()?;
        self.client_secret()?;
        self.redirect_uri()?;
        Ok(())
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OAuthProvider::Spotify => write!(f, "spotify"),
            OAuthProvider::Youtube => write!(f, "youtube"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<&str>) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string))
                .unwrap_or_default(),
            scope: self.scope,
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the OAuth 2.0 PKCE authorization flow for `provider` and stores the
/// resulting token.
///
/// A local callback server is started on `SERVER_ADDRESS`, the user's browser
/// is pointed at the provider's consent page and the function waits up to 60
/// seconds for the callback to hand over a token.
///
/// # Errors
///
/// Fails when configuration is incomplete, the callback never arrives, or the
/// token cannot be written to the local data directory.
pub async fn auth(
    provider: OAuthProvider,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
) -> crate::Res<()> {
    provider.validate()?;
    let addr = config::server_addr()?;

    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(&addr, provider, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let mut auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        auth_url = provider.auth_url(),
        client_id = provider.client_id()?,
        redirect_uri = urlencoding::encode(&provider.redirect_uri()?),
        code_challenge = code_challenge,
        scope = urlencoding::encode(&provider.scope()),
    );
    if provider == OAuthProvider::Youtube {
        // Google only returns a refresh token for offline access with consent.
        auth_url.push_str("&access_type=offline&prompt=consent");
    }

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(t) => {
            TokenManager::new(provider, t).persist().await?;
            success!("Authentication with {} successful!", provider);
            Ok(())
        }
        None => Err(format!("Authentication with {} failed or timed out.", provider).into()),
    }
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

pub async fn exchange_code_pkce(
    provider: OAuthProvider,
    code: &str,
    verifier: &str,
) -> crate::Res<Token> {
    let client_id = provider.client_id()?;
    let redirect_uri = provider.redirect_uri()?;
    let client_secret = provider.client_secret()?;

    let mut form = vec![
        ("grant_type", "authorization_code".to_string()),
        ("client_id", client_id),
        ("code", code.to_string()),
        ("code_verifier", verifier.to_string()),
        ("redirect_uri", redirect_uri),
    ];
    if let Some(secret) = client_secret {
        form.push(("client_secret", secret));
    }

    let res = Client::new()
        .post(provider.token_url())
        .form(&form)
        .send()
        .await?
        .error_for_status()?;

    let token: TokenResponse = res.json().await?;
    Ok(token.into_token(None))
}

pub async fn refresh_token(provider: OAuthProvider, refresh_token: &str) -> crate::Res<Token> {
    let mut form = vec![
        ("grant_type", "refresh_token".to_string()),
        ("refresh_token", refresh_token.to_string()),
        ("client_id", provider.client_id()?),
    ];
    if let Some(secret) = provider.client_secret()? {
        form.push(("client_secret", secret));
    }

    let res = Client::new()
        .post(provider.token_url())
        .form(&form)
        .send()
        .await?
        .error_for_status()?;

    let token: TokenResponse = res.json().await?;
    Ok(token.into_token(Some(refresh_token)))
}
