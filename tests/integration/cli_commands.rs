//! Integration tests for CLI command routing

use crate::integration::test_utils::{ControlledBackend, FakeCatalog, RecordingResolver};
use clap::Parser;
use std::sync::Arc;
use tempfile::TempDir;
use wrapview::cli::{Cli, RunContext};
use wrapview::config::WrapviewConfig;
use wrapview::{ApiError, Collaborators};

fn context() -> RunContext {
    let resolver = RecordingResolver::new().answering("AB12CDE", Some("BMW"), Some("M4"), None);
    let collaborators = Collaborators {
        catalog: Arc::new(FakeCatalog::standard()),
        resolver: Arc::new(resolver),
        backend: Arc::new(ControlledBackend::new()),
    };
    RunContext::with_collaborators(WrapviewConfig::default(), collaborators)
}

async fn run(context: &RunContext, args: &[&str]) -> Result<String, ApiError> {
    let cli = Cli::try_parse_from(args).unwrap();
    context.execute(&cli.command).await
}

#[tokio::test]
async fn test_lookup_command_reports_resolved_vehicle() {
    let out = run(&context(), &["wrapview", "lookup", "ab12 cde"])
        .await
        .unwrap();
    assert!(out.starts_with("Lookup: resolved"));
    assert!(out.contains("Make:  BMW"));
    assert!(out.contains("Model: M4"));
}

#[tokio::test]
async fn test_preview_from_registration() {
    let out = run(
        &context(),
        &[
            "wrapview",
            "preview",
            "--registration",
            "AB12CDE",
            "--wrap",
            "Satin Black",
        ],
    )
    .await
    .unwrap();
    assert!(out.contains("BMW M4"));
    assert!(out.contains("Satin Black (Satin)"));
    assert!(out.contains("#12151C"));
}

#[tokio::test]
async fn test_preview_json_output() {
    let out = run(
        &context(),
        &[
            "wrapview", "preview", "--make", "Audi", "--model", "A4", "--wrap", "Nardo Grey",
            "--format", "json",
        ],
    )
    .await
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["generation"]["status"], "done");
    assert_eq!(value["generation"]["summary"]["vehicle_label"], "Audi A4");
    assert_eq!(value["ready_to_generate"], true);
}

#[tokio::test]
async fn test_unknown_wrap_fails_the_command() {
    let result = run(
        &context(),
        &["wrapview", "preview", "--make", "Audi", "--wrap", "Chrome"],
    )
    .await;
    assert!(matches!(result, Err(ApiError::Selection(_))));
}

#[tokio::test]
async fn test_context_from_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("wrapview.toml");
    std::fs::write(
        &config_file,
        r#"
[generation]
simulated_delay_ms = 1
"#,
    )
    .unwrap();

    let context = RunContext::new(temp_dir.path().to_path_buf(), Some(config_file), true).unwrap();
    assert_eq!(context.config().generation.simulated_delay_ms, 1);

    let out = run(&context, &["wrapview", "makes"]).await.unwrap();
    assert!(out.starts_with("Makes (7):"));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("wrapview.toml");
    std::fs::write(
        &config_file,
        r#"
[catalog]
base_url = "not-a-url"
"#,
    )
    .unwrap();

    let result = RunContext::new(temp_dir.path().to_path_buf(), Some(config_file), false);
    assert!(matches!(result, Err(ApiError::Config(_))));
}
