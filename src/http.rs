//! Shared HTTP plumbing for the catalog and registration clients.

use crate::error::ServiceError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

pub fn build_http_client(config: &HttpConfig) -> Result<Client, ServiceError> {
    Client::builder()
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .build()
        .map_err(|e| ServiceError::RequestFailed(format!("Failed to create HTTP client: {}", e)))
}

/// Map a reqwest error onto the service error taxonomy
pub fn map_http_error(error: reqwest::Error) -> ServiceError {
    if let Some(status) = error.status() {
        ServiceError::Status {
            status: status.as_u16(),
            body: error.to_string(),
        }
    } else if error.is_timeout() {
        ServiceError::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ServiceError::Unavailable(format!("Connection error: {}", error))
    } else {
        ServiceError::RequestFailed(format!("HTTP error: {}", error))
    }
}

/// Decode a JSON body, turning non-success statuses into `ServiceError::Status`
pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// Join a base URL and an absolute path without doubling slashes
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
