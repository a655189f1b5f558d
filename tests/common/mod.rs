#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use tune2tube::{
    platform::{DestinationPlatform, PlatformError},
    sync::Interrupt,
    types::{PlaylistEntry, PlaylistRef, Visibility},
};

#[derive(Default)]
pub struct FakeState {
    pub catalog: HashMap<String, String>,
    pub search_errors: HashSet<String>,
    pub search_calls: Vec<String>,
    pub items: Vec<PlaylistEntry>,
    pub insert_failures: HashMap<String, PlatformError>,
    pub insert_calls: Vec<String>,
    pub delete_failures: HashSet<String>,
    pub delete_calls: Vec<String>,
    pub list_error: Option<PlatformError>,
    pub playlists: Vec<PlaylistRef>,
    pub created: Vec<(String, String, Visibility)>,
    pub interrupt_after_inserts: Option<(usize, Interrupt)>,
    next_handle: usize,
}

/// In-memory destination playlist that records every call made against it.
#[derive(Default)]
pub struct FakeDestination {
    pub state: Mutex<FakeState>,
}

impl FakeDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(self, query: &str, video_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .catalog
            .insert(query.to_string(), video_id.to_string());
        self
    }

    pub fn with_item(self, video_id: &str, handle: &str) -> Self {
        self.state.lock().unwrap().items.push(PlaylistEntry {
            video_id: video_id.to_string(),
            item_handle: handle.to_string(),
        });
        self
    }

    pub fn failing_search(self, query: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .search_errors
            .insert(query.to_string());
        self
    }

    pub fn failing_insert(self, video_id: &str, err: PlatformError) -> Self {
        self.state
            .lock()
            .unwrap()
            .insert_failures
            .insert(video_id.to_string(), err);
        self
    }

    pub fn failing_delete(self, handle: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .delete_failures
            .insert(handle.to_string());
        self
    }

    pub fn with_playlist(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().playlists.push(PlaylistRef {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn interrupt_after(self, inserts: usize, interrupt: Interrupt) -> Self {
        self.state.lock().unwrap().interrupt_after_inserts = Some((inserts, interrupt));
        self
    }

    /// Quota came back: every insert succeeds from now on.
    pub fn reset_quota(&self) {
        self.state.lock().unwrap().insert_failures.clear();
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().search_calls.clone()
    }

    pub fn insert_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().insert_calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().delete_calls.clone()
    }

    pub fn video_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .map(|e| e.video_id.clone())
            .collect()
    }
}

pub fn quota_error() -> PlatformError {
    PlatformError::QuotaExceeded("The request cannot be completed because you have exceeded your quota.".to_string())
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl DestinationPlatform for FakeDestination {
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> Result<String, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state
            .created
            .push((name.to_string(), description.to_string(), visibility));
        let id = format!("PL{}", state.created.len());
        state.playlists.push(PlaylistRef {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn search_first_video(&self, query: &str) -> Result<Option<String>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.search_calls.push(query.to_string());
        if state.search_errors.contains(query) {
            return Err(PlatformError::Transport("connection reset".to_string()));
        }
        Ok(state.catalog.get(query).cloned())
    }

    async fn insert_playlist_item(
        &self,
        _playlist_id: &str,
        video_id: &str,
    ) -> Result<String, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls.push(video_id.to_string());
        if let Some(err) = state.insert_failures.get(video_id) {
            return Err(err.clone());
        }

        state.next_handle += 1;
        let handle = format!("item-{}", state.next_handle);
        state.items.push(PlaylistEntry {
            video_id: video_id.to_string(),
            item_handle: handle.clone(),
        });

        let done = state.insert_calls.len();
        if let Some((after, interrupt)) = &state.interrupt_after_inserts {
            if done >= *after {
                interrupt.trigger();
            }
        }
        Ok(handle)
    }

    async fn delete_playlist_item(&self, item_handle: &str) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(item_handle.to_string());
        if state.delete_failures.contains(item_handle) {
            return Err(PlatformError::NotFound(item_handle.to_string()));
        }
        state.items.retain(|e| e.item_handle != item_handle);
        Ok(())
    }

    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, PlatformError> {
        let state = self.state.lock().unwrap();
        if let Some(err) = &state.list_error {
            return Err(err.clone());
        }
        Ok(state.items.clone())
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistRef>, PlatformError> {
        let state = self.state.lock().unwrap();
        Ok(state.playlists.iter().find(|p| p.name == name).cloned())
    }
}
