use std::path::PathBuf;

use chrono::Utc;

use super::store::{self, StoreError};
use crate::{
    oauth::{self, OAuthProvider},
    types::Token,
    warning,
};

pub struct TokenManager {
    provider: OAuthProvider,
    token: Token,
}

impl TokenManager {
    pub fn new(provider: OAuthProvider, token: Token) -> Self {
        TokenManager { provider, token }
    }

    pub async fn load(provider: OAuthProvider) -> Result<Self, StoreError> {
        let token: Token = store::read_json(&Self::token_path(provider)).await?;
        Ok(Self { provider, token })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        store::write_json(&Self::token_path(self.provider), &self.token).await
    }

    /// Returns an access token, refreshing it first when it is about to
    /// expire. A failed refresh falls back to the current token and lets the
    /// remote call report the auth failure.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match oauth::refresh_token(self.provider, &self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to store refreshed {} token: {}", self.provider, e);
                    }
                }
                Err(e) => warning!("Failed to refresh {} token: {}", self.provider, e),
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + 240 >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path(provider: OAuthProvider) -> PathBuf {
        let mut path = store::data_dir();
        path.push(format!("cache/{provider}-token.json"));
        path
    }
}
