use std::time::Duration;

use thiserror::Error;

use super::{
    Interrupt,
    differ::diff,
    executor::{HaltReason, MutationExecutor},
    resolver::TrackResolver,
};
use crate::{
    info,
    management::{MatchCache, ResumeLedger, StoreError},
    platform::{DestinationPlatform, PlatformError},
    types::{PlaylistSnapshot, ResumeState, Visibility},
    warning,
};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("failed to persist sync state: {0}")]
    Store(#[from] StoreError),
}

/// The destination playlist a run writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub playlist_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub playlist_id: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub unresolved: Vec<String>,
    pub remove_failures: Vec<(String, PlatformError)>,
    /// Stale rows left in place because a lookup failed during this run.
    pub stale_kept: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncHalt {
    /// Query of the first track that was not added.
    pub stopped_at: String,
    /// Everything persisted to the resume ledger, starting with `stopped_at`.
    pub pending: Vec<String>,
    pub reason: HaltReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    Halted { report: SyncReport, halt: SyncHalt },
}

impl SyncOutcome {
    pub fn report(&self) -> &SyncReport {
        match self {
            SyncOutcome::Completed(report) => report,
            SyncOutcome::Halted { report, .. } => report,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SyncOutcome::Completed(_))
    }
}

pub struct SyncEngine<'a, D: DestinationPlatform + ?Sized> {
    destination: &'a D,
    resolver: TrackResolver<'a, D>,
    executor: MutationExecutor<'a, D>,
    ledger: &'a ResumeLedger,
    quiet: bool,
}

impl<'a, D: DestinationPlatform + ?Sized> SyncEngine<'a, D> {
    pub fn new(
        destination: &'a D,
        cache: MatchCache,
        ledger: &'a ResumeLedger,
        delay: Duration,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            destination,
            resolver: TrackResolver::new(destination, cache, delay),
            executor: MutationExecutor::new(destination, delay, interrupt),
            ledger,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.resolver = self.resolver.quiet(quiet);
        self.executor = self.executor.quiet(quiet);
        self.quiet = quiet;
        self
    }

    pub fn cache(&self) -> &MatchCache {
        self.resolver.cache()
    }

    /// Reuses a destination playlist with the same name, or creates one.
    /// Returns the playlist id and whether it was newly created.
    pub async fn ensure_playlist(
        &self,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> Result<(String, bool), PlatformError> {
        if let Some(existing) = self.destination.find_playlist_by_name(name).await? {
            return Ok((existing.id, false));
        }
        let id = self
            .destination
            .create_playlist(name, description, visibility)
            .await?;
        Ok((id, true))
    }

    /// Brings `target` in line with `queries`.
    ///
    /// Queries are resolved first and the match cache is flushed. The remote
    /// membership is then diffed against the resolved ids. Stale rows are
    /// removed when `remove_stale` is set and every search succeeded, and
    /// missing videos are appended in query order. An interrupt during the
    /// removals halts before any add and records every query.
    ///
    /// When an add fails or the run is interrupted, the ledger is overwritten
    /// with the suffix of `queries` that starts at the first query resolving
    /// to the video that was not added, so the failed item is retried next
    /// time. The ledger is written before this function returns.
    pub async fn run(
        &mut self,
        target: &SyncTarget,
        queries: &[String],
        remove_stale: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let resolved = self.resolver.resolve_all(queries).await;
        if let Err(e) = self.resolver.cache_mut().persist().await {
            warning!("Failed to save match cache: {}", e);
        }

        let mut report = SyncReport {
            playlist_id: target.playlist_id.clone(),
            ..SyncReport::default()
        };

        let mut desired = Vec::with_capacity(queries.len());
        for query in queries {
            match resolved.get(query) {
                Some(Some(video_id)) => desired.push(video_id.clone()),
                _ => {
                    if !report.unresolved.contains(query) {
                        report.unresolved.push(query.clone());
                    }
                }
            }
        }

        let items = match self
            .destination
            .list_playlist_items(&target.playlist_id)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                let halt = self.halt_at(target, queries, 0, HaltReason::Failed(e)).await?;
                return Ok(SyncOutcome::Halted { report, halt });
            }
        };

        let snapshot = PlaylistSnapshot {
            id: target.playlist_id.clone(),
            name: target.name.clone(),
            description: target.description.clone(),
            items,
        };
        let plan = diff(&desired, &snapshot);

        // a failed search hides a video that may well belong in the playlist
        let removals_allowed = remove_stale && self.resolver.failed_lookups().is_empty();

        if !self.quiet {
            if plan.is_empty() {
                info!("Nothing to change, {} without a match", report.unresolved.len());
            } else {
                info!(
                    "{} to add, {} to remove, {} without a match",
                    plan.to_add.len(),
                    if removals_allowed { plan.to_remove.len() } else { 0 },
                    report.unresolved.len()
                );
            }
        }

        if remove_stale && !removals_allowed {
            report.stale_kept = plan.to_remove.len();
        }

        if removals_allowed && !plan.to_remove.is_empty() {
            let removes = self.executor.apply_removes(&plan.to_remove).await;
            report.removed = removes.succeeded;
            report.remove_failures = removes.failures;

            if removes.interrupted {
                let halt = self
                    .halt_at(target, queries, 0, HaltReason::Interrupted)
                    .await?;
                return Ok(SyncOutcome::Halted { report, halt });
            }
        }

        let adds = self
            .executor
            .apply_adds(&target.playlist_id, &plan.to_add)
            .await;
        report.added = adds.succeeded;

        let Some(add_halt) = adds.halt else {
            return Ok(SyncOutcome::Completed(report));
        };

        let video_id = &plan.to_add[add_halt.index];
        let position = queries
            .iter()
            .position(|q| matches!(resolved.get(q), Some(Some(v)) if v == video_id))
            .unwrap_or(0);

        let halt = self
            .halt_at(target, queries, position, add_halt.reason)
            .await?;
        Ok(SyncOutcome::Halted { report, halt })
    }

    async fn halt_at(
        &self,
        target: &SyncTarget,
        queries: &[String],
        position: usize,
        reason: HaltReason,
    ) -> Result<SyncHalt, StoreError> {
        let pending = queries[position.min(queries.len())..].to_vec();
        self.ledger
            .save(&ResumeState {
                target_playlist_id: target.playlist_id.clone(),
                pending_queries: pending.clone(),
                name: target.name.clone(),
                description: target.description.clone(),
            })
            .await?;

        Ok(SyncHalt {
            stopped_at: pending.first().cloned().unwrap_or_default(),
            pending,
            reason,
        })
    }

    /// Continues the work recorded in the ledger.
    ///
    /// Returns `None` when there is nothing to resume. A ledger with an empty
    /// pending list is cleared and reported as completed. A halted resume
    /// leaves the ledger shrunk to the new remainder.
    pub async fn resume(&mut self) -> Result<Option<SyncOutcome>, SyncError> {
        let Some(state) = self.ledger.load().await? else {
            return Ok(None);
        };

        if state.pending_queries.is_empty() && state.target_playlist_id.is_empty() {
            self.ledger.clear().await?;
            return Ok(None);
        }

        let target = SyncTarget {
            playlist_id: state.target_playlist_id.clone(),
            name: state.name.clone(),
            description: state.description.clone(),
        };

        if state.pending_queries.is_empty() {
            self.ledger.clear().await?;
            return Ok(Some(SyncOutcome::Completed(SyncReport {
                playlist_id: target.playlist_id,
                ..SyncReport::default()
            })));
        }

        let outcome = self.run(&target, &state.pending_queries, false).await?;
        if outcome.is_completed() {
            self.ledger.clear().await?;
        }
        Ok(Some(outcome))
    }
}
