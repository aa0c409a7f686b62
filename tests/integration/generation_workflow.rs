//! Integration tests for the preview generation status machine

use crate::integration::test_utils::Harness;
use wrapview::generation::GenerationState;
use wrapview::session::Slot;
use wrapview::{CompletionOutcome, ServiceError};

async fn ready_harness() -> Harness {
    let mut h = Harness::standard();
    h.choose_vehicle("BMW", "M4").await;
    h.session.select_wrap_by_name("British Racing Green").unwrap();
    h
}

#[tokio::test]
async fn test_pending_is_visible_before_result() {
    let mut h = ready_harness().await;
    h.backend.hold();
    let mut rx = h.session.subscribe();

    assert!(h.session.generate());
    assert!(rx.borrow_and_update().generation.is_pending());
    assert_eq!(h.session.in_flight(), 1);

    h.backend.release();
    h.session.settle().await;
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.generation.as_str(), "done");
    assert_eq!(
        snapshot.generation.summary().unwrap().render.as_deref(),
        Some("memory://render/1")
    );
}

#[tokio::test]
async fn test_generate_while_pending_does_not_start_second_request() {
    let mut h = ready_harness().await;
    h.backend.hold();
    assert!(h.session.generate());
    assert!(!h.session.generate());

    h.backend.release();
    h.session.settle().await;
    assert_eq!(h.backend.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_generation_can_be_retried() {
    let mut h = ready_harness().await;
    h.backend
        .fail_with(ServiceError::Unavailable("renderer offline".to_string()));

    h.session.generate();
    h.session.settle().await;
    match h.session.generation() {
        GenerationState::Failed { message } => {
            assert!(message.starts_with("Preview generation failed"));
            assert!(message.contains("renderer offline"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(h.session.generation().headline(), "Preview failed");

    h.backend.succeed();
    assert!(h.session.generate());
    h.session.settle().await;
    let summary = h.session.generation().summary().unwrap();
    assert_eq!(summary.vehicle_label, "BMW M4");
    assert_eq!(summary.wrap_label, "British Racing Green (Satin)");
}

#[tokio::test]
async fn test_selection_edit_after_done_returns_to_idle() {
    let mut h = ready_harness().await;
    h.session.generate();
    h.session.settle().await;
    assert!(h.session.generation().summary().is_some());

    h.session.select_wrap(None);
    assert_eq!(h.session.generation(), &GenerationState::Idle);
    assert!(!h.session.ready_to_generate());
    assert!(!h.session.generate());
}

#[tokio::test]
async fn test_make_change_discards_pending_generation() {
    let mut h = ready_harness().await;
    h.backend.hold();
    h.session.generate();

    h.session.select_make("Audi");
    assert_eq!(h.session.generation(), &GenerationState::Idle);

    h.backend.release();
    let outcomes = h.session.settle().await;
    assert!(outcomes.contains(&CompletionOutcome::Discarded(Slot::Generation)));
    assert_eq!(h.session.generation(), &GenerationState::Idle);
    assert!(!h.session.ready_to_generate());
}

#[tokio::test]
async fn test_summary_matches_request_snapshot() {
    let mut h = ready_harness().await;
    h.session.generate();
    h.session.settle().await;

    let requests = h.backend.requests();
    let summary = h.session.generation().summary().unwrap();
    assert_eq!(summary.vehicle_label, requests[0].vehicle.label());
    assert_eq!(summary.wrap_label, requests[0].wrap.label());
    assert_eq!(summary.swatch, requests[0].wrap.swatch());
}
