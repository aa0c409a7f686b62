//! Generation backend abstraction.
//!
//! The real renderer is an external collaborator; until it is wired up the simulated backend
//! waits a fixed delay and succeeds.

use crate::error::ServiceError;
use crate::generation::GenerationRequest;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// What the backend hands back for a finished preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPreview {
    /// Location of the rendered image, when the backend produces one
    pub location: Option<String>,
}

/// Generation backend trait
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<RenderedPreview, ServiceError>;

    fn backend_name(&self) -> &str;
}

/// Fixed-delay success, standing in for the renderer
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(850);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl GenerationBackend for SimulatedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<RenderedPreview, ServiceError> {
        debug!(
            vehicle = %request.vehicle.label(),
            wrap = request.wrap.name,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating preview render"
        );
        tokio::time::sleep(self.delay).await;
        Ok(RenderedPreview::default())
    }

    fn backend_name(&self) -> &str {
        "simulated"
    }
}
