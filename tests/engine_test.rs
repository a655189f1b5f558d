mod common;

use std::{path::Path, time::Duration};

use common::{FakeDestination, quota_error, strings};
use tempfile::TempDir;
use tune2tube::{
    management::{MatchCache, ResumeLedger},
    platform::PlatformError,
    sync::{HaltReason, Interrupt, SyncEngine, SyncOutcome, SyncTarget},
    types::{ResumeState, Visibility},
};

fn target() -> SyncTarget {
    SyncTarget {
        playlist_id: "PL1".to_string(),
        name: "Road Trip".to_string(),
        description: "Songs for the car".to_string(),
    }
}

fn ledger_in(dir: &TempDir) -> ResumeLedger {
    ResumeLedger::new(dir.path().join("state/resume.json"))
}

async fn cache_in(dir: &Path) -> MatchCache {
    MatchCache::load(dir.join("cache/matches.json")).await.unwrap()
}

fn catalog() -> FakeDestination {
    FakeDestination::new()
        .with_video("A by X", "va")
        .with_video("B by Y", "vb")
        .with_video("C by Z", "vc")
}

fn engine<'a>(
    destination: &'a FakeDestination,
    cache: MatchCache,
    ledger: &'a ResumeLedger,
) -> SyncEngine<'a, FakeDestination> {
    SyncEngine::new(destination, cache, ledger, Duration::ZERO, Interrupt::new()).quiet(true)
}

#[tokio::test]
async fn test_run_completes_and_leaves_no_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog();

    let mut engine = engine(&destination, cache_in(dir.path()).await, &ledger);
    let outcome = engine
        .run(&target(), &strings(&["A by X", "B by Y", "C by Z"]), false)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().added, strings(&["va", "vb", "vc"]));
    assert_eq!(destination.video_ids(), strings(&["va", "vb", "vc"]));
    assert_eq!(ledger.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_quota_halt_saves_remaining_queries() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().failing_insert("vb", quota_error());

    let mut engine = engine(&destination, cache_in(dir.path()).await, &ledger);
    let queries = strings(&["A by X", "B by Y", "C by Z"]);
    let outcome = engine.run(&target(), &queries, false).await.unwrap();

    let SyncOutcome::Halted { report, halt } = outcome else {
        panic!("expected the run to halt");
    };
    assert_eq!(report.added, strings(&["va"]));
    assert_eq!(halt.stopped_at, "B by Y");
    assert_eq!(halt.pending, strings(&["B by Y", "C by Z"]));
    assert_eq!(halt.reason, HaltReason::Failed(quota_error()));
    assert!(!destination.insert_calls().contains(&"vc".to_string()));

    let saved = ledger.load().await.unwrap().unwrap();
    assert_eq!(
        saved,
        ResumeState {
            target_playlist_id: "PL1".to_string(),
            pending_queries: strings(&["B by Y", "C by Z"]),
            name: "Road Trip".to_string(),
            description: "Songs for the car".to_string(),
        }
    );
}

#[tokio::test]
async fn test_resume_after_quota_reset_clears_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().failing_insert("vb", quota_error());
    let queries = strings(&["A by X", "B by Y", "C by Z"]);

    engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, false)
        .await
        .unwrap();
    destination.reset_quota();
    let searches_before = destination.search_calls().len();

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .resume()
        .await
        .unwrap()
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().added, strings(&["vb", "vc"]));
    assert_eq!(destination.video_ids(), strings(&["va", "vb", "vc"]));
    assert_eq!(ledger.load().await.unwrap(), None);
    // matches came from the persisted cache
    assert_eq!(destination.search_calls().len(), searches_before);
}

#[tokio::test]
async fn test_resume_that_halts_again_shrinks_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog()
        .failing_insert("vb", quota_error())
        .failing_insert("vc", quota_error());
    let queries = strings(&["A by X", "B by Y", "C by Z"]);

    engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, false)
        .await
        .unwrap();
    destination
        .state
        .lock()
        .unwrap()
        .insert_failures
        .remove("vb");

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .resume()
        .await
        .unwrap()
        .unwrap();

    assert!(!outcome.is_completed());
    assert_eq!(outcome.report().added, strings(&["vb"]));
    let saved = ledger.load().await.unwrap().unwrap();
    assert_eq!(saved.pending_queries, strings(&["C by Z"]));
}

#[tokio::test]
async fn test_resume_without_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog();

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .resume()
        .await
        .unwrap();

    assert_eq!(outcome, None);
    assert!(destination.search_calls().is_empty());
}

#[tokio::test]
async fn test_resume_with_empty_pending_clears_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    ledger
        .save(&ResumeState {
            target_playlist_id: "PL1".to_string(),
            pending_queries: Vec::new(),
            name: "Road Trip".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let destination = catalog();

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .resume()
        .await
        .unwrap()
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().playlist_id, "PL1");
    assert_eq!(ledger.load().await.unwrap(), None);
    assert!(destination.insert_calls().is_empty());
}

#[tokio::test]
async fn test_sync_removes_stale_entries() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = FakeDestination::new()
        .with_video("One by A", "v1")
        .with_video("Two by B", "v2")
        .with_video("Three by C", "v3")
        .with_item("v1", "h1")
        .with_item("v4", "h4");

    let mut engine = engine(&destination, cache_in(dir.path()).await, &ledger);
    let outcome = engine
        .run(
            &target(),
            &strings(&["One by A", "Two by B", "Three by C"]),
            true,
        )
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().removed, strings(&["h4"]));
    assert_eq!(outcome.report().added, strings(&["v2", "v3"]));
    assert_eq!(destination.video_ids(), strings(&["v1", "v2", "v3"]));
}

#[tokio::test]
async fn test_second_run_makes_no_mutations() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().with_item("vz", "hz");
    let queries = strings(&["A by X", "B by Y", "C by Z"]);

    engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, true)
        .await
        .unwrap();
    let inserts = destination.insert_calls().len();
    let deletes = destination.delete_calls().len();

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, true)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert!(outcome.report().added.is_empty());
    assert!(outcome.report().removed.is_empty());
    assert_eq!(destination.insert_calls().len(), inserts);
    assert_eq!(destination.delete_calls().len(), deletes);
}

#[tokio::test]
async fn test_create_run_keeps_unrelated_entries() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().with_item("vz", "hz");

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &strings(&["A by X"]), false)
        .await
        .unwrap();

    assert!(outcome.report().removed.is_empty());
    assert!(destination.delete_calls().is_empty());
    assert_eq!(destination.video_ids(), strings(&["vz", "va"]));
}

#[tokio::test]
async fn test_unresolved_queries_are_reported_not_added() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().failing_search("Flaky by Band");

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(
            &target(),
            &strings(&["A by X", "Nothing by Nobody", "Flaky by Band", "Nothing by Nobody"]),
            false,
        )
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(outcome.report().added, strings(&["va"]));
    assert_eq!(
        outcome.report().unresolved,
        strings(&["Nothing by Nobody", "Flaky by Band"])
    );

    let cache = cache_in(dir.path()).await;
    assert_eq!(cache.get("Nothing by Nobody"), Some(None));
    assert!(!cache.contains("Flaky by Band"));
}

#[tokio::test]
async fn test_list_failure_saves_every_query() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog();
    destination.state.lock().unwrap().list_error =
        Some(PlatformError::Unauthorized("token expired".to_string()));
    let queries = strings(&["A by X", "B by Y"]);

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, true)
        .await
        .unwrap();

    let SyncOutcome::Halted { halt, .. } = outcome else {
        panic!("expected the run to halt");
    };
    assert_eq!(halt.pending, queries);
    assert!(destination.insert_calls().is_empty());
    assert_eq!(
        ledger.load().await.unwrap().unwrap().pending_queries,
        queries
    );
}

#[tokio::test]
async fn test_interrupt_saves_progress() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let interrupt = Interrupt::new();
    let destination = catalog().interrupt_after(1, interrupt.clone());

    let mut engine = SyncEngine::new(
        &destination,
        cache_in(dir.path()).await,
        &ledger,
        Duration::ZERO,
        interrupt,
    )
    .quiet(true);
    let outcome = engine
        .run(&target(), &strings(&["A by X", "B by Y", "C by Z"]), false)
        .await
        .unwrap();

    let SyncOutcome::Halted { halt, .. } = outcome else {
        panic!("expected the run to halt");
    };
    assert_eq!(halt.reason, HaltReason::Interrupted);
    assert_eq!(halt.pending, strings(&["B by Y", "C by Z"]));
}

#[tokio::test]
async fn test_ensure_playlist_reuses_existing() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog().with_playlist("PLexisting", "Road Trip");
    let engine = engine(&destination, cache_in(dir.path()).await, &ledger);

    let (id, created) = engine
        .ensure_playlist("Road Trip", "", Visibility::Private)
        .await
        .unwrap();
    assert_eq!(id, "PLexisting");
    assert!(!created);

    let (id, created) = engine
        .ensure_playlist("New Mix", "fresh", Visibility::Public)
        .await
        .unwrap();
    assert_eq!(id, "PL1");
    assert!(created);
    assert_eq!(
        destination.state.lock().unwrap().created,
        vec![("New Mix".to_string(), "fresh".to_string(), Visibility::Public)]
    );
}

#[tokio::test]
async fn test_failed_search_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog()
        .failing_search("A by X")
        .with_item("va", "h-a")
        .with_item("vzz", "h-zz");

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &strings(&["A by X", "B by Y"]), true)
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert!(outcome.report().removed.is_empty());
    assert_eq!(outcome.report().stale_kept, 2);
    assert_eq!(outcome.report().unresolved, strings(&["A by X"]));
    assert!(destination.delete_calls().is_empty());
    assert_eq!(destination.video_ids(), strings(&["va", "vzz", "vb"]));
}

#[tokio::test]
async fn test_stale_rows_removed_once_searches_recover() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let destination = catalog()
        .failing_search("A by X")
        .with_item("va", "h-a")
        .with_item("vzz", "h-zz");
    let queries = strings(&["A by X", "B by Y"]);

    engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, true)
        .await
        .unwrap();
    destination.state.lock().unwrap().search_errors.clear();

    let outcome = engine(&destination, cache_in(dir.path()).await, &ledger)
        .run(&target(), &queries, true)
        .await
        .unwrap();

    assert_eq!(outcome.report().removed, strings(&["h-zz"]));
    assert_eq!(outcome.report().stale_kept, 0);
    assert_eq!(destination.video_ids(), strings(&["va", "vb"]));
}

#[tokio::test]
async fn test_interrupt_during_removals_halts() {
    let dir = TempDir::new().unwrap();
    let ledger = ledger_in(&dir);
    let interrupt = Interrupt::new();
    interrupt.trigger();
    let destination = catalog()
        .with_item("va", "h-a")
        .with_item("stale1", "h-s1")
        .with_item("stale2", "h-s2");

    let mut engine = SyncEngine::new(
        &destination,
        cache_in(dir.path()).await,
        &ledger,
        Duration::ZERO,
        interrupt,
    )
    .quiet(true);
    let outcome = engine
        .run(&target(), &strings(&["A by X"]), true)
        .await
        .unwrap();

    let SyncOutcome::Halted { report, halt } = outcome else {
        panic!("expected the run to halt");
    };
    assert!(report.removed.is_empty());
    assert_eq!(halt.reason, HaltReason::Interrupted);
    assert_eq!(halt.pending, strings(&["A by X"]));
    assert_eq!(destination.video_ids(), strings(&["va", "stale1", "stale2"]));
    assert_eq!(
        ledger.load().await.unwrap().unwrap().pending_queries,
        strings(&["A by X"])
    );
}
