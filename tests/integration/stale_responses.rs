//! Integration tests for out-of-order completions and timeouts

use crate::integration::test_utils::{FakeCatalog, Harness, RecordingResolver};
use std::time::Duration;
use wrapview::generation::GenerationState;
use wrapview::registration::{LookupStatus, LOOKUP_FAILED_MESSAGE};
use wrapview::session::Slot;
use wrapview::{CompletionOutcome, SessionConfig};

#[tokio::test]
async fn test_stale_models_response_is_discarded() {
    let mut h = Harness::standard();
    h.catalog.hold("Audi");

    h.session.select_make("Audi");
    h.session.select_make("BMW");
    assert_eq!(h.session.in_flight(), 2);

    // BMW answers first
    assert_eq!(
        h.session.next_completion().await,
        Some(CompletionOutcome::Applied(Slot::Models))
    );
    assert_eq!(h.session.models(), ["M3", "M4", "X5"]);

    // the late Audi list must not overwrite it
    h.catalog.release("Audi");
    assert_eq!(
        h.session.next_completion().await,
        Some(CompletionOutcome::Discarded(Slot::Models))
    );
    assert_eq!(h.session.model_options().make(), "BMW");
    assert_eq!(h.session.models(), ["M3", "M4", "X5"]);
    assert_eq!(h.session.next_completion().await, None);
}

#[tokio::test]
async fn test_switching_back_discards_intermediate_list() {
    let mut h = Harness::standard();
    h.catalog.hold("BMW");

    h.session.select_make("Audi");
    h.session.select_make("BMW");
    h.session.select_make("Audi");

    h.catalog.release("BMW");
    let outcomes = h.session.settle().await;
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, CompletionOutcome::Applied(_)))
            .count(),
        1
    );
    assert_eq!(h.session.model_options().make(), "Audi");
    assert_eq!(h.session.models(), ["A1", "A3", "A4"]);
}

#[tokio::test]
async fn test_stale_lookup_is_discarded() {
    let resolver = RecordingResolver::new()
        .answering("OLD1", Some("Audi"), Some("A4"), None)
        .answering("NEW2", Some("BMW"), Some("M3"), Some("BMW M3 found"));
    resolver.hold("OLD1");
    let mut h = Harness::new(FakeCatalog::standard(), resolver);

    assert!(h.session.lookup("old1"));
    assert!(h.session.lookup("new2"));

    // NEW2 lookup, then the BMW model refresh it triggers
    h.session.next_completion().await;
    h.session.next_completion().await;
    assert_eq!(h.session.selection().make(), "BMW");
    assert_eq!(h.session.selection().model(), "M3");

    h.resolver.release("OLD1");
    assert_eq!(
        h.session.next_completion().await,
        Some(CompletionOutcome::Discarded(Slot::Lookup))
    );
    assert_eq!(h.session.selection().make(), "BMW");
    assert_eq!(h.session.selection().model(), "M3");
    assert_eq!(
        h.session.lookup_state().message.as_deref(),
        Some("BMW M3 found")
    );
}

#[tokio::test]
async fn test_stale_generation_is_discarded_after_model_change() {
    let mut h = Harness::standard();
    h.choose_vehicle("Audi", "A3").await;
    h.session.select_wrap_by_name("Miami Blue").unwrap();
    h.backend.hold();
    assert!(h.session.generate());

    h.session.select_model("A4").unwrap();
    assert_eq!(h.session.generation(), &GenerationState::Idle);

    h.backend.release();
    let outcomes = h.session.settle().await;
    assert_eq!(outcomes, vec![CompletionOutcome::Discarded(Slot::Generation)]);
    assert_eq!(h.session.generation(), &GenerationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_hung_model_fetch_times_out() {
    let config = SessionConfig {
        request_timeout_ms: Some(500),
        ..SessionConfig::default()
    };
    let mut h = Harness::with_config(FakeCatalog::standard(), RecordingResolver::new(), config);
    h.catalog.hold("Audi");

    h.session.select_make("Audi");
    let outcomes = h.session.settle().await;

    assert_eq!(outcomes, vec![CompletionOutcome::Applied(Slot::Models)]);
    assert!(h.session.models().is_empty());
    assert_eq!(h.session.selection().make(), "Audi");
    assert_eq!(h.session.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_hung_lookup_times_out_as_failure() {
    let config = SessionConfig {
        request_timeout_ms: Some(2_000),
        ..SessionConfig::default()
    };
    let resolver = RecordingResolver::new().answering("SLOW1", Some("Audi"), None, None);
    resolver.hold("SLOW1");
    let mut h = Harness::with_config(FakeCatalog::standard(), resolver, config);

    let started = tokio::time::Instant::now();
    assert!(h.session.lookup("slow1"));
    h.session.settle().await;

    assert!(started.elapsed() >= Duration::from_millis(2_000));
    assert_eq!(h.session.lookup_state().status, LookupStatus::Failed);
    assert_eq!(
        h.session.lookup_state().message.as_deref(),
        Some(LOOKUP_FAILED_MESSAGE)
    );
    assert_eq!(h.session.selection().make(), "");
}
