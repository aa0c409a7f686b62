//! Preview Generation
//!
//! Status machine for the preview generation step and the read-only summary produced when a
//! generation finishes. The backend itself lives behind [`backend::GenerationBackend`].

use crate::selection::{SelectionState, VehicleIdentity};
use crate::wrap::{Swatch, WrapOption};
use serde::Serialize;

pub mod backend;

pub use backend::{GenerationBackend, RenderedPreview, SimulatedBackend};

/// Finalized configuration handed to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub vehicle: VehicleIdentity,
    pub wrap: &'static WrapOption,
}

impl GenerationRequest {
    /// Snapshot the selection; `None` unless it is ready to generate
    pub fn from_selection(selection: &SelectionState) -> Option<Self> {
        if !selection.ready_to_generate() {
            return None;
        }
        Some(Self {
            vehicle: selection.vehicle()?,
            wrap: selection.wrap()?,
        })
    }
}

/// Read-only projection shown once a preview is done
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    pub vehicle_label: String,
    pub wrap_label: String,
    pub swatch: Swatch,
    /// Backend-provided handle to the rendered image, if any
    pub render: Option<String>,
}

impl PreviewSummary {
    pub fn new(request: &GenerationRequest, rendered: RenderedPreview) -> Self {
        Self {
            vehicle_label: request.vehicle.label(),
            wrap_label: request.wrap.label(),
            swatch: request.wrap.swatch(),
            render: rendered.location,
        }
    }
}

/// Generation status
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationState {
    #[default]
    Idle,
    Pending,
    Done { summary: PreviewSummary },
    Failed { message: String },
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Pending => "pending",
            GenerationState::Done { .. } => "done",
            GenerationState::Failed { .. } => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GenerationState::Pending)
    }

    pub fn summary(&self) -> Option<&PreviewSummary> {
        match self {
            GenerationState::Done { summary } => Some(summary),
            _ => None,
        }
    }

    /// Short status line for display
    pub fn headline(&self) -> &'static str {
        match self {
            GenerationState::Idle => "No preview yet",
            GenerationState::Pending => "Rendering…",
            GenerationState::Done { .. } => "Preview summary",
            GenerationState::Failed { .. } => "Preview failed",
        }
    }
}
