use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use super::Interrupt;
use crate::{
    platform::{DestinationPlatform, PlatformError},
    warning,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    Failed(PlatformError),
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddHalt {
    /// Position in the add list of the first item that was not applied.
    pub index: usize,
    pub reason: HaltReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    pub succeeded: Vec<String>,
    pub halt: Option<AddHalt>,
}

impl AddReport {
    pub fn first_failure_index(&self) -> Option<usize> {
        self.halt.as_ref().map(|h| h.index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub succeeded: Vec<String>,
    pub failures: Vec<(String, PlatformError)>,
    pub interrupted: bool,
}

pub struct MutationExecutor<'a, D: DestinationPlatform + ?Sized> {
    destination: &'a D,
    delay: Duration,
    interrupt: Interrupt,
    quiet: bool,
}

impl<'a, D: DestinationPlatform + ?Sized> MutationExecutor<'a, D> {
    pub fn new(destination: &'a D, delay: Duration, interrupt: Interrupt) -> Self {
        Self {
            destination,
            delay,
            interrupt,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn progress(&self, len: usize) -> ProgressBar {
        let pb = if self.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(len as u64)
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{pos}/{len}] {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb
    }

    /// Appends `to_add` in order, one call per video.
    ///
    /// The first failure stops the sequence: with an exhausted quota every
    /// following call would fail the same way. The returned halt index points
    /// at the failed item, so `to_add[index..]` is exactly what still needs
    /// to be done.
    pub async fn apply_adds(&self, playlist_id: &str, to_add: &[String]) -> AddReport {
        let pb = self.progress(to_add.len());
        let mut report = AddReport::default();

        for (index, video_id) in to_add.iter().enumerate() {
            if index > 0 {
                sleep(self.delay).await;
            }
            if self.interrupt.is_triggered() {
                report.halt = Some(AddHalt {
                    index,
                    reason: HaltReason::Interrupted,
                });
                break;
            }

            pb.set_message(format!("Adding {}", video_id));
            match self
                .destination
                .insert_playlist_item(playlist_id, video_id)
                .await
            {
                Ok(_) => {
                    report.succeeded.push(video_id.clone());
                    pb.inc(1);
                }
                Err(e) => {
                    report.halt = Some(AddHalt {
                        index,
                        reason: HaltReason::Failed(e),
                    });
                    break;
                }
            }
        }

        pb.finish_and_clear();
        report
    }

    /// Deletes every membership row in `to_remove`. A failed delete is
    /// logged and skipped.
    pub async fn apply_removes(&self, to_remove: &[String]) -> RemoveReport {
        let pb = self.progress(to_remove.len());
        let mut report = RemoveReport::default();

        for (index, handle) in to_remove.iter().enumerate() {
            if index > 0 {
                sleep(self.delay).await;
            }
            if self.interrupt.is_triggered() {
                report.interrupted = true;
                break;
            }

            pb.set_message(format!("Removing {}", handle));
            match self.destination.delete_playlist_item(handle).await {
                Ok(()) => report.succeeded.push(handle.clone()),
                Err(e) => {
                    if !self.quiet {
                        pb.suspend(|| warning!("Failed to remove playlist item {}: {}", handle, e));
                    }
                    report.failures.push((handle.clone(), e));
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        report
    }
}
