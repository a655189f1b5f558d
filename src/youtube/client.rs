use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    config,
    http::send_with_retry,
    management::TokenManager,
    platform::{DestinationPlatform, PlatformError},
    types::{
        CreatePlaylistRequest, GoogleErrorResponse, InsertPlaylistItemRequest,
        PlaylistEntry, PlaylistItemListResponse, PlaylistItemSnippetBody, PlaylistListResponse,
        PlaylistRef, PlaylistSnippetBody, PlaylistStatusBody, ResourceId, SearchListResponse,
        Visibility, YoutubeResource,
    },
};

const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "dailyLimitExceeded",
];

/// Maps a failed Google API response onto a [`PlatformError`], using the
/// structured `error.errors[].reason` field when the body carries one.
pub fn classify_google_error(status: StatusCode, body: &str) -> PlatformError {
    let Ok(parsed) = serde_json::from_str::<GoogleErrorResponse>(body) else {
        return PlatformError::from_status(status, body.to_string());
    };

    let message = parsed.error.message;
    if parsed
        .error
        .errors
        .iter()
        .any(|e| QUOTA_REASONS.contains(&e.reason.as_str()))
    {
        return PlatformError::QuotaExceeded(message);
    }

    let status = StatusCode::from_u16(parsed.error.code).unwrap_or(status);
    PlatformError::from_status(status, message)
}

pub struct YoutubeClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl YoutubeClient {
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: config::youtube_api_url(),
            tokens: Mutex::new(tokens),
        }
    }

    async fn execute<F>(&self, make: F) -> Result<Response, PlatformError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let token = self.tokens.lock().await.get_valid_token().await;
        let response = send_with_retry(|| make(&self.http, &token)).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_google_error(status, &body))
    }

    async fn execute_json<T, F>(&self, make: F) -> Result<T, PlatformError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        self.execute(make)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DestinationPlatform for YoutubeClient {
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> Result<String, PlatformError> {
        let url = format!("{}/playlists?part=snippet,status", self.api_url);
        let body = CreatePlaylistRequest {
            snippet: PlaylistSnippetBody {
                title: name.to_string(),
                description: description.to_string(),
                default_language: "en".to_string(),
            },
            status: PlaylistStatusBody {
                privacy_status: visibility,
            },
        };

        let created: YoutubeResource = self
            .execute_json(|http, token| http.post(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(created.id)
    }

    async fn search_first_video(&self, query: &str) -> Result<Option<String>, PlatformError> {
        let url = format!(
            "{}/search?part=snippet&type=video&maxResults=1&q={}",
            self.api_url,
            urlencoding::encode(query)
        );

        let results: SearchListResponse = self
            .execute_json(|http, token| http.get(&url).bearer_auth(token))
            .await?;
        Ok(results
            .items
            .into_iter()
            .find_map(|item| item.id.video_id))
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<String, PlatformError> {
        let url = format!("{}/playlistItems?part=snippet", self.api_url);
        let body = InsertPlaylistItemRequest {
            snippet: PlaylistItemSnippetBody {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: "youtube#video".to_string(),
                    video_id: Some(video_id.to_string()),
                },
            },
        };

        let item: YoutubeResource = self
            .execute_json(|http, token| http.post(&url).bearer_auth(token).json(&body))
            .await?;
        Ok(item.id)
    }

    async fn delete_playlist_item(&self, item_handle: &str) -> Result<(), PlatformError> {
        let url = format!(
            "{}/playlistItems?id={}",
            self.api_url,
            urlencoding::encode(item_handle)
        );
        self.execute(|http, token| http.delete(&url).bearer_auth(token))
            .await?;
        Ok(())
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, PlatformError> {
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/playlistItems?part=snippet&maxResults=50&playlistId={}",
                self.api_url,
                urlencoding::encode(playlist_id)
            );
            if let Some(page) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(page)));
            }

            let page: PlaylistItemListResponse = self
                .execute_json(|http, token| http.get(&url).bearer_auth(token))
                .await?;

            entries.extend(page.items.into_iter().filter_map(|item| {
                item.snippet.resource_id.video_id.map(|video_id| PlaylistEntry {
                    video_id,
                    item_handle: item.id,
                })
            }));

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(entries)
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistRef>, PlatformError> {
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/playlists?part=snippet&mine=true&maxResults=50",
                self.api_url
            );
            if let Some(page) = &page_token {
                url.push_str(&format!("&pageToken={}", urlencoding::encode(page)));
            }

            let page: PlaylistListResponse = self
                .execute_json(|http, token| http.get(&url).bearer_auth(token))
                .await?;

            if let Some(found) = page.items.into_iter().find(|p| p.snippet.title == name) {
                return Ok(Some(PlaylistRef {
                    id: found.id,
                    name: found.snippet.title,
                }));
            }

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => return Ok(None),
            }
        }
    }
}
