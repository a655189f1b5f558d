//! # Sync engine
//!
//! Turns a source track list into destination playlist membership and keeps
//! enough state on disk to pick up again after a halt.
//!
//! ```text
//! queries ──▶ TrackResolver ──▶ desired video ids
//!                                   │
//!          list_playlist_items ──▶ diff ──▶ SyncPlan { to_add, to_remove }
//!                                                │
//!                                     MutationExecutor (removes, then adds)
//!                                                │ first add failure
//!                                                ▼
//!                                          ResumeLedger
//! ```
//!
//! The engine is single-threaded by construction: every remote call is
//! awaited before the next one is issued, and consecutive calls are spaced by
//! a configurable delay. The only cancellation point is between two
//! mutations, checked through [`Interrupt`].

mod differ;
mod engine;
mod executor;
mod resolver;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

pub use differ::diff;
pub use engine::{SyncEngine, SyncError, SyncHalt, SyncOutcome, SyncReport, SyncTarget};
pub use executor::{AddHalt, AddReport, HaltReason, MutationExecutor, RemoveReport};
pub use resolver::TrackResolver;

use crate::warning;

/// Cooperative cancellation flag shared between the Ctrl-C watcher and the
/// executor.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Spawns a task that triggers this flag on the first Ctrl-C.
    pub fn watch_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warning!("Interrupt received, stopping after the current request...");
                flag.trigger();
            }
        });
    }
}
