//! Registration Lookup
//!
//! Resolves a UK vehicle registration (VRM) to a make and model. The lookup has its own status
//! channel ([`LookupState`]) which never blocks manual selection.

use crate::error::ServiceError;
use crate::http::{build_http_client, endpoint, map_http_error, read_json, HttpConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

/// Message stored when the resolver fails or is not wired up
pub const LOOKUP_FAILED_MESSAGE: &str =
    "Registration lookup is not available yet. Select the make and model manually.";

/// Message stored on success when the resolver supplies none
pub const LOOKUP_RESOLVED_MESSAGE: &str = "Vehicle details found.";

/// Normalize raw user input into a registration: NFKC, no whitespace, uppercase.
///
/// Returns `None` when nothing is left.
pub fn normalize_registration(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .nfkc()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Resolver response; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Registration resolver trait
#[async_trait]
pub trait RegistrationResolver: Send + Sync {
    /// Resolve an already-normalized registration
    async fn resolve(&self, registration: &str) -> Result<LookupResponse, ServiceError>;
}

/// Lookup status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    #[default]
    Idle,
    Pending,
    Resolved,
    Failed,
}

impl LookupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LookupStatus::Idle => "idle",
            LookupStatus::Pending => "pending",
            LookupStatus::Resolved => "resolved",
            LookupStatus::Failed => "failed",
        }
    }
}

/// Transient status of the registration lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupState {
    pub status: LookupStatus,
    pub message: Option<String>,
}

impl LookupState {
    pub fn pending() -> Self {
        Self {
            status: LookupStatus::Pending,
            message: None,
        }
    }

    pub fn resolved(message: Option<String>) -> Self {
        Self {
            status: LookupStatus::Resolved,
            message: Some(message.unwrap_or_else(|| LOOKUP_RESOLVED_MESSAGE.to_string())),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: LookupStatus::Failed,
            message: Some(LOOKUP_FAILED_MESSAGE.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == LookupStatus::Pending
    }
}

/// Resolver served over HTTP: `GET {base}/api/vrm?vrm=..`
pub struct HttpRegistrationResolver {
    client: Client,
    base_url: String,
}

impl HttpRegistrationResolver {
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_http_client(http)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RegistrationResolver for HttpRegistrationResolver {
    async fn resolve(&self, registration: &str) -> Result<LookupResponse, ServiceError> {
        let url = endpoint(&self.base_url, "/api/vrm");
        debug!(url = %url, registration = %registration, "Resolving registration");
        let response = self
            .client
            .get(&url)
            .query(&[("vrm", registration)])
            .send()
            .await
            .map_err(map_http_error)?;
        read_json(response).await
    }
}

/// Resolver used until a registration service is wired up; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableResolver;

#[async_trait]
impl RegistrationResolver for UnavailableResolver {
    async fn resolve(&self, _registration: &str) -> Result<LookupResponse, ServiceError> {
        Err(ServiceError::Unavailable(
            "registration lookup is not configured".to_string(),
        ))
    }
}
