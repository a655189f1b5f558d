use std::{collections::HashMap, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    management::MatchCache, platform::DestinationPlatform, types::ResolvedMatch, warning,
};

pub struct TrackResolver<'a, D: DestinationPlatform + ?Sized> {
    destination: &'a D,
    cache: MatchCache,
    spacing: Duration,
    searched: bool,
    failed: Vec<String>,
    quiet: bool,
}

impl<'a, D: DestinationPlatform + ?Sized> TrackResolver<'a, D> {
    pub fn new(destination: &'a D, cache: MatchCache, spacing: Duration) -> Self {
        Self {
            destination,
            cache,
            spacing,
            searched: false,
            failed: Vec::new(),
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Resolves one query, cache first.
    ///
    /// A cache miss costs exactly one remote search with the query text as
    /// is. Its outcome, including "no result", is cached before returning. A
    /// failing search is logged, reported as unresolved and left uncached so
    /// a later run can try again.
    pub async fn resolve(&mut self, query: &str) -> ResolvedMatch {
        if let Some(hit) = self.cache.get(query) {
            return ResolvedMatch {
                query: query.to_string(),
                video_id: hit.map(str::to_string),
            };
        }

        if self.searched {
            sleep(self.spacing).await;
        }
        self.searched = true;

        match self.destination.search_first_video(query).await {
            Ok(video_id) => {
                self.cache.insert(query.to_string(), video_id.clone());
                ResolvedMatch {
                    query: query.to_string(),
                    video_id,
                }
            }
            Err(e) => {
                if !self.quiet {
                    warning!("Search for \"{}\" failed: {}", query, e);
                }
                if !self.failed.iter().any(|q| q == query) {
                    self.failed.push(query.to_string());
                }
                ResolvedMatch {
                    query: query.to_string(),
                    video_id: None,
                }
            }
        }
    }

    /// Resolves every query, looking up repeated queries only once.
    ///
    /// Queries whose search failed map to `None` like real misses. They are
    /// listed by [`failed_lookups`](Self::failed_lookups) until the next
    /// batch starts.
    pub async fn resolve_all(&mut self, queries: &[String]) -> HashMap<String, Option<String>> {
        self.failed.clear();
        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(queries.len() as u64)
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }

        let mut resolved = HashMap::with_capacity(queries.len());
        for query in queries {
            pb.inc(1);
            if resolved.contains_key(query) {
                continue;
            }
            pb.set_message(format!("Searching for {}", query));
            let matched = self.resolve(query).await;
            resolved.insert(matched.query, matched.video_id);
        }

        pb.finish_and_clear();
        resolved
    }

    /// Queries whose search errored during the last batch, in first-seen
    /// order.
    pub fn failed_lookups(&self) -> &[String] {
        &self.failed
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut MatchCache {
        &mut self.cache
    }
}
