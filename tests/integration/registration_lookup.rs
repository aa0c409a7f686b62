//! Integration tests for registration lookup

use crate::integration::test_utils::{FakeCatalog, Harness, RecordingResolver};
use wrapview::generation::GenerationState;
use wrapview::registration::{
    LookupState, LookupStatus, LOOKUP_FAILED_MESSAGE, LOOKUP_RESOLVED_MESSAGE,
};
use wrapview::session::Slot;
use wrapview::{CompletionOutcome, SessionConfig};

fn resolver() -> RecordingResolver {
    RecordingResolver::new()
        .answering("AB12CDE", Some("BMW"), Some("M4"), None)
        .answering("MAKE0NLY", Some("Audi"), None, Some("Only the make is known"))
        .answering("MODEL0NLY", None, Some("A3"), None)
}

#[tokio::test]
async fn test_registration_is_normalized_before_sending() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.session.set_registration_input("ab12 cde");
    assert_eq!(h.session.registration_input(), "ab12 cde");

    assert!(h.session.lookup_registration());
    assert!(h.session.lookup_state().is_pending());
    h.session.settle().await;

    assert_eq!(h.resolver.received(), vec!["AB12CDE"]);
    assert_eq!(h.session.lookup_state().status, LookupStatus::Resolved);
}

#[tokio::test]
async fn test_successful_lookup_sets_make_and_model() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.choose_vehicle("Audi", "A3").await;

    assert!(h.session.lookup("AB12 CDE"));
    let outcomes = h.session.settle().await;

    assert_eq!(
        outcomes,
        vec![
            CompletionOutcome::Applied(Slot::Lookup),
            CompletionOutcome::Applied(Slot::Models),
        ]
    );
    assert_eq!(h.session.selection().make(), "BMW");
    assert_eq!(h.session.selection().model(), "M4");
    assert_eq!(h.session.model_options().make(), "BMW");
    assert_eq!(
        h.session.lookup_state().message.as_deref(),
        Some(LOOKUP_RESOLVED_MESSAGE)
    );
    assert_eq!(h.catalog.model_calls(), vec!["Audi", "BMW"]);
}

#[tokio::test]
async fn test_lookup_without_model_refresh() {
    let config = SessionConfig {
        refresh_models_after_lookup: false,
        ..SessionConfig::default()
    };
    let mut h = Harness::with_config(FakeCatalog::standard(), resolver(), config);

    h.session.lookup("ab12cde");
    h.session.settle().await;

    assert_eq!(h.session.selection().make(), "BMW");
    assert_eq!(h.session.selection().model(), "M4");
    assert!(h.session.models().is_empty());
    assert!(h.catalog.model_calls().is_empty());
}

#[tokio::test]
async fn test_lookup_make_only_clears_previous_model() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.choose_vehicle("BMW", "X5").await;

    h.session.lookup("make0nly");
    h.session.settle().await;

    assert_eq!(h.session.selection().make(), "Audi");
    assert_eq!(h.session.selection().model(), "");
    assert_eq!(h.session.models(), ["A1", "A3", "A4"]);
    assert_eq!(
        h.session.lookup_state().message.as_deref(),
        Some("Only the make is known")
    );
}

#[tokio::test]
async fn test_resolved_model_survives_failed_refresh() {
    let mut h = Harness::new(FakeCatalog::standard().failing_models_for("BMW"), resolver());
    h.session.lookup("AB12CDE");
    h.session.settle().await;

    assert_eq!(h.session.selection().make(), "BMW");
    assert_eq!(h.session.selection().model(), "M4");
    assert!(h.session.models().is_empty());
}

#[tokio::test]
async fn test_failed_lookup_leaves_selection_unchanged() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.choose_vehicle("Audi", "A1").await;

    assert!(h.session.lookup("INVALID"));
    h.session.settle().await;

    assert_eq!(h.resolver.received(), vec!["INVALID"]);
    assert_eq!(h.session.lookup_state(), &LookupState::failed());
    assert_eq!(
        h.session.lookup_state().message.as_deref(),
        Some(LOOKUP_FAILED_MESSAGE)
    );
    assert_eq!(h.session.selection().make(), "Audi");
    assert_eq!(h.session.selection().model(), "A1");
}

#[tokio::test]
async fn test_blank_registration_is_not_sent() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    assert!(!h.session.lookup(" \t "));
    assert!(!h.session.lookup(""));
    assert_eq!(h.session.lookup_state().status, LookupStatus::Idle);
    assert_eq!(h.session.next_completion().await, None);
    assert!(h.resolver.received().is_empty());
}

#[tokio::test]
async fn test_resolved_lookup_drops_previous_preview() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.choose_vehicle("Audi", "A3").await;
    h.session.select_wrap_by_name("Gloss Black").unwrap();
    h.session.generate();
    h.session.settle().await;
    assert!(h.session.generation().summary().is_some());

    h.session.lookup("AB12CDE");
    h.session.settle().await;
    assert_eq!(h.session.generation(), &GenerationState::Idle);
    assert!(h.session.ready_to_generate());
}

#[tokio::test]
async fn test_resolved_model_without_make_is_ignored() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.session.lookup("model0nly");
    h.session.settle().await;

    assert_eq!(h.session.lookup_state().status, LookupStatus::Resolved);
    assert_eq!(h.session.selection().make(), "");
    assert_eq!(h.session.selection().model(), "");
}

#[tokio::test]
async fn test_resolved_model_applies_to_current_make() {
    let mut h = Harness::new(FakeCatalog::standard(), resolver());
    h.choose_vehicle("Audi", "A1").await;

    h.session.lookup("MODEL0NLY");
    h.session.settle().await;

    assert_eq!(h.session.selection().make(), "Audi");
    assert_eq!(h.session.selection().model(), "A3");
}
