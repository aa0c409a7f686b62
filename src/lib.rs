//! Wrapview: Vehicle Wrap Preview Configurator
//!
//! Coordinates the vehicle catalog, registration lookup and photo intake into one consistent
//! selection, gates preview generation on readiness, and drives the generation step through a
//! small status machine. Rendering itself is an external collaborator.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod intake;
pub mod logging;
pub mod registration;
pub mod selection;
pub mod session;
pub mod wrap;

pub use error::{ApiError, IntakeError, SelectionError, ServiceError};
pub use session::{Collaborators, CompletionOutcome, PreviewSession, SessionConfig};
