//! Vehicle Catalog Source
//!
//! The make → models reference data served by an external catalog. Makes are listed once per
//! session; models are listed on demand for a given make. Implementations are idempotent and may
//! fail; the session degrades failures to empty lists.

use crate::error::ServiceError;
use crate::http::{build_http_client, endpoint, map_http_error, read_json, HttpConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Catalog source trait
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List every known make
    async fn list_makes(&self) -> Result<Vec<String>, ServiceError>;

    /// List the models offered for `make`, in display order
    async fn list_models(&self, make: &str) -> Result<Vec<String>, ServiceError>;
}

/// Model list paired with the make that produced it.
///
/// A list is only meaningful for its own make; callers discard it the moment the make changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelOptions {
    make: String,
    models: Vec<String>,
}

impl ModelOptions {
    pub fn new(make: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            make: make.into(),
            models,
        }
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Whether `model` was listed for `make`
    pub fn offers(&self, make: &str, model: &str) -> bool {
        self.make == make && self.models.iter().any(|m| m == model)
    }

    pub fn clear(&mut self) {
        self.make.clear();
        self.models.clear();
    }
}

#[derive(Deserialize)]
struct MakesResponse {
    #[serde(default)]
    makes: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Option<Vec<String>>,
}

/// Catalog served over HTTP
///
/// `GET {base}/api/vehicles/makes` → `{ "makes": [...] }`,
/// `GET {base}/api/vehicles/models?make=..` → `{ "models": [...] }`.
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Result<Self, ServiceError> {
        Ok(Self {
            client: build_http_client(http)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn list_makes(&self) -> Result<Vec<String>, ServiceError> {
        let url = endpoint(&self.base_url, "/api/vehicles/makes");
        debug!(url = %url, "Listing makes");
        let response = self.client.get(&url).send().await.map_err(map_http_error)?;
        let body: MakesResponse = read_json(response).await?;
        Ok(body.makes.unwrap_or_default())
    }

    async fn list_models(&self, make: &str) -> Result<Vec<String>, ServiceError> {
        let url = endpoint(&self.base_url, "/api/vehicles/models");
        debug!(url = %url, make = %make, "Listing models");
        let response = self
            .client
            .get(&url)
            .query(&[("make", make)])
            .send()
            .await
            .map_err(map_http_error)?;
        let body: ModelsResponse = read_json(response).await?;
        Ok(body.models.unwrap_or_default())
    }
}

/// In-memory catalog, used for demos and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    entries: BTreeMap<String, Vec<String>>,
}

impl StaticCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_make<I, S>(mut self, make: impl Into<String>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(make.into(), models.into_iter().map(Into::into).collect());
        self
    }

    /// Small built-in catalog covering the showcased brands
    pub fn demo() -> Self {
        Self::new()
            .with_make("Audi", ["A1", "A3", "A4", "A6", "Q3", "Q5", "RS3", "TT"])
            .with_make("BMW", ["1 Series", "3 Series", "5 Series", "M3", "M4", "X5"])
            .with_make("Lamborghini", ["Huracan", "Urus", "Revuelto"])
            .with_make("Mercedes", ["A-Class", "C-Class", "E-Class", "G-Class", "Sprinter"])
            .with_make("Porsche", ["911", "Cayenne", "Macan", "Taycan"])
            .with_make("Tesla", ["Model 3", "Model S", "Model X", "Model Y"])
            .with_make("Volkswagen", ["Golf", "Polo", "Transporter", "ID.4"])
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn list_makes(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.entries.keys().cloned().collect())
    }

    async fn list_models(&self, make: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self.entries.get(make).cloned().unwrap_or_default())
    }
}
