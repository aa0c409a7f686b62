//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, SelectionError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Selection(SelectionError::UnknownWrap(name)) => format!(
            "Unknown wrap '{}'. Run `wrapview wraps` to list the palette.",
            name
        ),
        ApiError::Selection(SelectionError::UnknownModel { make, model }) => format!(
            "'{}' is not offered for {}. Run `wrapview models \"{}\"` to list models.",
            model, make, make
        ),
        _ => e.to_string(),
    }
}
