//! Observable read model of a session, republished after every transition.

use crate::catalog::ModelOptions;
use crate::generation::GenerationState;
use crate::registration::LookupState;
use crate::selection::SelectionState;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub makes: Vec<String>,
    pub model_options: ModelOptions,
    pub selection: SelectionState,
    pub registration_input: String,
    pub lookup: LookupState,
    pub generation: GenerationState,
    pub ready_to_generate: bool,
    pub readiness_hint: &'static str,
    pub in_flight: usize,
}
