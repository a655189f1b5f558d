use std::collections::HashSet;

use crate::types::{PlaylistSnapshot, SyncPlan};

/// Computes what has to change for `current` to hold exactly `desired`.
///
/// `to_add` keeps the order of `desired` and lists each missing video once.
/// `to_remove` holds the membership handle of every entry whose video is not
/// desired, so duplicate rows of an unwanted video are all removed.
pub fn diff(desired: &[String], current: &PlaylistSnapshot) -> SyncPlan {
    let present: HashSet<&str> = current.items.iter().map(|e| e.video_id.as_str()).collect();
    let wanted: HashSet<&str> = desired.iter().map(String::as_str).collect();

    let mut queued = HashSet::new();
    let to_add = desired
        .iter()
        .filter(|id| !present.contains(id.as_str()))
        .filter(|id| queued.insert(id.as_str()))
        .cloned()
        .collect();

    let to_remove = current
        .items
        .iter()
        .filter(|e| !wanted.contains(e.video_id.as_str()))
        .map(|e| e.item_handle.clone())
        .collect();

    SyncPlan { to_add, to_remove }
}
