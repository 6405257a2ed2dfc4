//! Behavior-driven tests for the observer queue
//!
//! These tests verify HOW snapshots flow from producers to a consumer and how the
//! observer shares static records between snapshots of the same instrument and day.

mod support;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use support::{client, default_live_payload, ins_code, serve_static, Page, ScriptedHttpClient, ASSIGNMENTS};
use tsetmc_core::{Instrument, LiveData, Observer};

/// Snapshot with its own copy of the static record, as if it had crossed a process boundary.
fn detached(snapshot: &Instrument) -> Instrument {
    let mut copy = snapshot.clone();
    copy.static_data = Arc::new((*snapshot.static_data).clone());
    copy
}

fn live_snapshot() -> Instrument {
    let http = ScriptedHttpClient::new();
    serve_static(&http, ASSIGNMENTS);
    http.serve(Page::Live, default_live_payload());
    client(&http)
        .get_live_data(&ins_code())
        .ok()
        .and_then(LiveData::into_snapshot)
        .expect("healthy snapshot")
}

// =============================================================================
// Observer: Static Record Interning
// =============================================================================

#[test]
fn when_thresholds_match_popped_snapshots_share_one_static_record() {
    // Given: Two snapshots of the same instrument and day with separate static copies
    let observer = Observer::new();
    let snapshot = live_snapshot();
    observer.put(detached(&snapshot));
    observer.put(detached(&snapshot));

    // When: Both are popped
    let first = observer.get();
    let second = observer.get();

    // Then: They point at the same static record
    assert!(Arc::ptr_eq(&first.static_data, &second.static_data));
    assert_eq!(observer.interned_len(), 1);
}

#[test]
fn when_threshold_changes_new_record_is_interned_for_later_snapshots() {
    // Given: A snapshot, then two with a raised upper threshold
    let observer = Observer::new();
    let snapshot = live_snapshot();
    let mut raised = detached(&snapshot);
    Arc::make_mut(&mut raised.static_data).high_threshold = 1_050;

    observer.put(detached(&snapshot));
    observer.put(detached(&raised));
    observer.put(detached(&raised));

    // When: All three are popped
    let original = observer.get();
    let replaced = observer.get();
    let follower = observer.get();

    // Then: The raised record replaced the interned one and is shared from then on
    assert_eq!(original.static_data.high_threshold, 1_000);
    assert_eq!(replaced.static_data.high_threshold, 1_050);
    assert!(!Arc::ptr_eq(&original.static_data, &replaced.static_data));
    assert!(Arc::ptr_eq(&replaced.static_data, &follower.static_data));
    assert_eq!(observer.interned_len(), 1);
}

// =============================================================================
// Observer: Producer / Consumer Hand-Off
// =============================================================================

#[test]
fn when_producers_run_on_other_threads_consumer_receives_every_snapshot() {
    // Given: An observer shared by four producer threads
    let observer = Arc::new(Observer::bounded(2));
    let snapshot = live_snapshot();

    let producers = (0..4)
        .map(|_| {
            let observer = Arc::clone(&observer);
            let snapshot = detached(&snapshot);
            thread::spawn(move || {
                for _ in 0..5 {
                    observer.put(detached(&snapshot));
                }
            })
        })
        .collect::<Vec<_>>();

    // When: The consumer drains twenty snapshots
    let received = (0..20).map(|_| observer.get()).collect::<Vec<_>>();
    for producer in producers {
        producer.join().expect("producer finished");
    }

    // Then: Every snapshot arrived and all share one static record
    assert_eq!(received.len(), 20);
    assert!(received
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0].static_data, &pair[1].static_data)));
    assert!(observer.is_empty());
}

#[test]
fn when_queue_stays_empty_timed_get_returns_nothing() {
    // Given: An observer nobody writes to
    let observer = Observer::new();

    // When: The consumer waits briefly
    let result = observer.get_timeout(Duration::from_millis(20));

    // Then: No snapshot is returned
    assert!(result.is_none());
    assert_eq!(observer.len(), 0);
}
