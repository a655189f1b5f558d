//! Configuration management for tune2tube.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file under `<data_local_dir>/tune2tube/.env`
//! 3. Defaults for the public API endpoints
//!
//! Credentials have no default. Their accessors return
//! [`ConfigError::Missing`] so the CLI can abort before any remote call.

use std::{env, time::Duration};

use thiserror::Error;

use crate::management::data_dir;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (environment or {env_file})", env_file = env_file_hint())]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_SCOPE: &str = "playlist-read-private user-library-read";
const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;

/// Loads `<data_local_dir>/tune2tube/.env` into the process environment.
///
/// The directory is created when missing. A missing `.env` file is fine,
/// every value may also come from the environment directly.
pub async fn load_env() -> Result<(), String> {
    let mut path = data_dir();
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Path of the `.env` file, shown in missing-variable errors.
fn env_file_hint() -> String {
    let mut path = data_dir();
    path.push(".env");
    path.display().to_string()
}

/// Reads a variable that has no default. Blank counts as unset.
fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Reads a variable, falling back to `default` when unset or blank.
fn with_default(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the address the local OAuth callback server binds to.
///
/// Read from `SERVER_ADDRESS`. Both redirect URIs must point at this
/// address, since the same server receives the Spotify and the Google
/// callback.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
///
/// # Example
///
/// ```
/// let addr = config::server_addr()?; // e.g. "127.0.0.1:8888"
/// ```
pub fn server_addr() -> Result<String, ConfigError> {
    required("SERVER_ADDRESS")
}

/// Returns the Spotify application client id.
///
/// Read from `SPOTIFY_CLIENT_ID`, as shown in the Spotify developer
/// dashboard. The Spotify PKCE flow needs no client secret.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the redirect URI registered for the Spotify application.
///
/// Read from `SPOTIFY_REDIRECT_URI`. It has to match the dashboard entry
/// exactly, e.g. `http://127.0.0.1:8888/callback`.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_REDIRECT_URI")
}

/// Returns the OAuth scopes requested from Spotify.
///
/// Defaults to `playlist-read-private user-library-read`, which covers
/// private playlists and Liked Songs. Override with `SPOTIFY_SCOPE`.
pub fn spotify_scope() -> String {
    with_default("SPOTIFY_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

/// Returns the Spotify authorization endpoint (`SPOTIFY_AUTH_URL`).
pub fn spotify_auth_url() -> String {
    with_default("SPOTIFY_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

/// Returns the Spotify token endpoint (`SPOTIFY_TOKEN_URL`), used for both
/// the code exchange and refreshes.
pub fn spotify_token_url() -> String {
    with_default("SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Returns the base URL of the Spotify Web API.
///
/// Defaults to `https://api.spotify.com/v1`. `SPOTIFY_API_URL` points the
/// client at a proxy or a local stand-in instead.
pub fn spotify_api_url() -> String {
    with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Returns the Google OAuth client id of the YouTube application.
///
/// Read from `YOUTUBE_CLIENT_ID`, as listed under the Google Cloud
/// console credentials of a "Desktop app" client.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
pub fn youtube_client_id() -> Result<String, ConfigError> {
    required("YOUTUBE_CLIENT_ID")
}

/// Returns the Google OAuth client secret.
///
/// Google issues a secret even for installed apps and expects it on every
/// token request. Read from `YOUTUBE_CLIENT_SECRET`.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
///
/// # Security Note
///
/// Keep the secret out of logs and version control. The `.env` file under
/// the data directory is the intended place for it.
pub fn youtube_client_secret() -> Result<String, ConfigError> {
    required("YOUTUBE_CLIENT_SECRET")
}

/// Returns the redirect URI registered for the Google OAuth client.
///
/// Read from `YOUTUBE_REDIRECT_URI`.
///
/// # Errors
///
/// [`ConfigError::Missing`] when the variable is unset or blank.
pub fn youtube_redirect_uri() -> Result<String, ConfigError> {
    required("YOUTUBE_REDIRECT_URI")
}

/// Returns the YouTube scope. `youtube.force-ssl` allows searching as well
/// as creating and editing playlists, and is not configurable.
pub fn youtube_scope() -> String {
    YOUTUBE_SCOPE.to_string()
}

/// Returns the Google authorization endpoint (`GOOGLE_AUTH_URL`).
pub fn google_auth_url() -> String {
    with_default("GOOGLE_AUTH_URL", DEFAULT_GOOGLE_AUTH_URL)
}

/// Returns the Google token endpoint (`GOOGLE_TOKEN_URL`).
pub fn google_token_url() -> String {
    with_default("GOOGLE_TOKEN_URL", DEFAULT_GOOGLE_TOKEN_URL)
}

/// Returns the base URL of the YouTube Data API v3.
///
/// Defaults to `https://www.googleapis.com/youtube/v3`. Override with
/// `YOUTUBE_API_URL`.
pub fn youtube_api_url() -> String {
    with_default("YOUTUBE_API_URL", DEFAULT_YOUTUBE_API_URL)
}

/// Returns the spacing between consecutive remote searches and between
/// playlist mutations.
///
/// Read from `TUNE2TUBE_REQUEST_DELAY_MS` in milliseconds, 1000 when unset.
/// `0` disables the spacing entirely.
///
/// # Errors
///
/// [`ConfigError::Invalid`] when the value is not a non-negative integer.
///
/// # Example
///
/// ```
/// // TUNE2TUBE_REQUEST_DELAY_MS=250
/// assert_eq!(config::request_delay()?, Duration::from_millis(250));
/// ```
pub fn request_delay() -> Result<Duration, ConfigError> {
    match env::var("TUNE2TUBE_REQUEST_DELAY_MS") {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid {
                var: "TUNE2TUBE_REQUEST_DELAY_MS",
                value,
            }),
        _ => Ok(Duration::from_millis(DEFAULT_REQUEST_DELAY_MS)),
    }
}
