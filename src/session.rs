//! Preview Session
//!
//! Owns the selection, lookup and generation state of one configurator session and coordinates
//! the external collaborators that feed it. Operations return immediately: external calls are
//! spawned onto the current Tokio runtime and their results come back through a completion
//! channel, which the caller drains with [`PreviewSession::next_completion`] or
//! [`PreviewSession::settle`].
//!
//! Completions are applied only while their request tag is current (see [`inflight`]); a result
//! for a superseded make, lookup or generation is discarded.

use crate::catalog::{CatalogSource, HttpCatalogSource, ModelOptions, StaticCatalogSource};
use crate::config::WrapviewConfig;
use crate::error::{IntakeError, SelectionError, ServiceError};
use crate::generation::{
    GenerationBackend, GenerationRequest, GenerationState, PreviewSummary, RenderedPreview,
    SimulatedBackend,
};
use crate::intake::{ImageFile, ImageIntake, ImageReference, IntakeSurface};
use crate::registration::{
    normalize_registration, HttpRegistrationResolver, LookupResponse, LookupState,
    RegistrationResolver, UnavailableResolver,
};
use crate::selection::SelectionState;
use crate::wrap::{find_wrap, WrapOption};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

pub mod inflight;
pub mod snapshot;

pub use inflight::{InFlightTracker, RequestTag, Slot};
pub use snapshot::SessionSnapshot;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn new_session_id() -> String {
    let ts = Utc::now().timestamp_millis();
    let pid = std::process::id();
    let seq = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("sess-{ts}-{pid}-{seq}")
}

/// Session behaviour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound for every external call; unset means no timeout
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Refetch the model list when a registration lookup changes the make
    #[serde(default = "default_true")]
    pub refresh_models_after_lookup: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: None,
            refresh_models_after_lookup: default_true(),
        }
    }
}

impl SessionConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// External collaborators of a session
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogSource>,
    pub resolver: Arc<dyn RegistrationResolver>,
    pub backend: Arc<dyn GenerationBackend>,
}

impl Collaborators {
    /// HTTP-backed collaborators as configured; `demo` swaps the catalog for the built-in one
    pub fn from_config(config: &WrapviewConfig, demo: bool) -> Result<Self, ServiceError> {
        let catalog: Arc<dyn CatalogSource> = if demo {
            Arc::new(StaticCatalogSource::demo())
        } else {
            Arc::new(HttpCatalogSource::new(
                config.catalog.base_url.clone(),
                &config.http,
            )?)
        };
        let resolver: Arc<dyn RegistrationResolver> = if config.registration.enabled {
            Arc::new(HttpRegistrationResolver::new(
                config.registration.base_url.clone(),
                &config.http,
            )?)
        } else {
            Arc::new(UnavailableResolver)
        };
        let backend = Arc::new(SimulatedBackend::new(Duration::from_millis(
            config.generation.simulated_delay_ms,
        )));
        Ok(Self {
            catalog,
            resolver,
            backend,
        })
    }
}

/// Result of draining one completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied(Slot),
    /// The request had been superseded; state was left untouched
    Discarded(Slot),
}

enum Completion {
    Makes {
        tag: RequestTag,
        result: Result<Vec<String>, ServiceError>,
    },
    Models {
        tag: RequestTag,
        make: String,
        result: Result<Vec<String>, ServiceError>,
    },
    Lookup {
        tag: RequestTag,
        registration: String,
        result: Result<LookupResponse, ServiceError>,
    },
    Generation {
        tag: RequestTag,
        request: GenerationRequest,
        result: Result<RenderedPreview, ServiceError>,
    },
}

/// One configurator session.
///
/// # Panics
///
/// Operations that reach an external collaborator (`initialize`, `select_make`,
/// `lookup_registration`, `lookup`, `generate`) spawn onto the ambient Tokio runtime and panic
/// when called outside one.
pub struct PreviewSession {
    id: String,
    collaborators: Collaborators,
    config: SessionConfig,
    intake: ImageIntake,
    initialized: bool,

    makes: Vec<String>,
    model_options: ModelOptions,
    selection: SelectionState,
    /// The current model was supplied by a registration lookup rather than picked from the list
    model_from_lookup: bool,
    /// A models request for the current make has been issued and not yet answered
    models_pending: bool,
    registration_input: String,
    lookup: LookupState,
    generation: GenerationState,

    tracker: InFlightTracker,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl PreviewSession {
    pub fn new(collaborators: Collaborators, config: SessionConfig) -> Self {
        let id = new_session_id();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        let session = Self {
            intake: ImageIntake::new(id.clone()),
            id,
            collaborators,
            config,
            initialized: false,
            makes: Vec::new(),
            model_options: ModelOptions::default(),
            selection: SelectionState::new(),
            model_from_lookup: false,
            models_pending: false,
            registration_input: String::new(),
            lookup: LookupState::default(),
            generation: GenerationState::Idle,
            tracker: InFlightTracker::new(),
            completions_tx,
            completions_rx,
            snapshot_tx,
        };
        session.publish();
        info!(session_id = %session.id, "Preview session created");
        session
    }

    /// Fetch the make list. Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let tag = self.tracker.issue(Slot::Makes);
        let catalog = self.collaborators.catalog.clone();
        self.dispatch(async move { catalog.list_makes().await }, move |result| {
            Completion::Makes { tag, result }
        });
        self.publish();
    }

    // ------------------------------------------------------------------
    // Selection operations
    // ------------------------------------------------------------------

    /// Change the make. The model and model list are cleared immediately; a non-empty make
    /// triggers a model fetch for that make.
    ///
    /// Re-selecting the current make keeps the selection. It only refetches when the list for
    /// that make is neither loaded nor in flight, e.g. after a failed fetch.
    pub fn select_make(&mut self, make: impl Into<String>) {
        let make = make.into();
        if make == self.selection.make() {
            let loaded = self.model_options.make() == make;
            if make.is_empty() || loaded || self.models_pending {
                return;
            }
            info!(session_id = %self.id, make = %make, "Retrying model list");
            self.fetch_models(make);
            self.publish();
            return;
        }
        self.change_make(make, true);
        self.publish();
    }

    /// Pick a model from the list fetched for the current make. An empty model clears it.
    pub fn select_model(&mut self, model: impl Into<String>) -> Result<(), SelectionError> {
        let model = model.into();
        if model == self.selection.model() {
            return Ok(());
        }
        if !model.is_empty() {
            let make = self.selection.make();
            if make.is_empty() {
                return Err(SelectionError::MakeNotSelected);
            }
            if !self.model_options.offers(make, &model) {
                return Err(SelectionError::UnknownModel {
                    make: make.to_string(),
                    model,
                });
            }
        }

        debug!(session_id = %self.id, model = %model, "Model selected");
        self.selection.set_model(model);
        self.model_from_lookup = false;
        self.invalidate_preview();
        self.publish();
        Ok(())
    }

    /// Select a wrap from the built-in catalog, or clear it with `None`
    pub fn select_wrap(&mut self, wrap: Option<&'static WrapOption>) {
        if wrap == self.selection.wrap() {
            return;
        }
        debug!(
            session_id = %self.id,
            wrap = wrap.map(|w| w.name).unwrap_or(""),
            "Wrap selected"
        );
        self.selection.set_wrap(wrap);
        self.invalidate_preview();
        self.publish();
    }

    pub fn select_wrap_by_name(&mut self, name: &str) -> Result<(), SelectionError> {
        let wrap = find_wrap(name)?;
        self.select_wrap(Some(wrap));
        Ok(())
    }

    /// Take a user-supplied photo as the vehicle identity. Non-images are rejected without
    /// touching any state.
    pub fn accept_image(
        &mut self,
        file: &ImageFile,
        surface: IntakeSurface,
    ) -> Result<ImageReference, IntakeError> {
        let reference = self.intake.accept(file, surface)?;
        self.selection.set_image(reference.clone());
        self.invalidate_preview();
        self.publish();
        Ok(reference)
    }

    // ------------------------------------------------------------------
    // Registration lookup
    // ------------------------------------------------------------------

    /// Store the raw registration text as typed
    pub fn set_registration_input(&mut self, raw: impl Into<String>) {
        self.registration_input = raw.into();
        self.publish();
    }

    /// Resolve the stored registration input. Returns `false` (and changes nothing) when the
    /// normalized input is empty.
    pub fn lookup_registration(&mut self) -> bool {
        let Some(registration) = normalize_registration(&self.registration_input) else {
            debug!(session_id = %self.id, "Empty registration, lookup skipped");
            return false;
        };

        info!(session_id = %self.id, registration = %registration, "Registration lookup started");
        self.lookup = LookupState::pending();
        let tag = self.tracker.issue(Slot::Lookup);
        let resolver = self.collaborators.resolver.clone();
        let sent = registration.clone();
        self.dispatch(async move { resolver.resolve(&sent).await }, move |result| {
            Completion::Lookup {
                tag,
                registration,
                result,
            }
        });
        self.publish();
        true
    }

    /// Convenience for `set_registration_input` followed by `lookup_registration`
    pub fn lookup(&mut self, raw: impl Into<String>) -> bool {
        self.registration_input = raw.into();
        self.lookup_registration()
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    /// Start a preview generation. A no-op (returning `false`) unless the selection is ready and
    /// no generation is already pending.
    pub fn generate(&mut self) -> bool {
        if self.generation.is_pending() {
            debug!(session_id = %self.id, "Generation already pending");
            return false;
        }
        let Some(request) = GenerationRequest::from_selection(&self.selection) else {
            debug!(session_id = %self.id, "Generation requested before selection is ready");
            return false;
        };

        info!(
            session_id = %self.id,
            vehicle = %request.vehicle.label(),
            wrap = request.wrap.name,
            backend = self.collaborators.backend.backend_name(),
            "Preview generation started"
        );
        self.generation = GenerationState::Pending;
        let tag = self.tracker.issue(Slot::Generation);
        let backend = self.collaborators.backend.clone();
        let sent = request.clone();
        self.dispatch(async move { backend.generate(sent).await }, move |result| {
            Completion::Generation {
                tag,
                request,
                result,
            }
        });
        self.publish();
        true
    }

    /// Return to the initial selection: no vehicle, wrap, photo, registration, lookup or preview.
    /// Outstanding models, lookup and generation requests are superseded; the make list is kept.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.model_options.clear();
        self.model_from_lookup = false;
        self.models_pending = false;
        self.registration_input.clear();
        self.lookup = LookupState::default();
        self.generation = GenerationState::Idle;
        self.tracker.invalidate(Slot::Models);
        self.tracker.invalidate(Slot::Lookup);
        self.tracker.invalidate(Slot::Generation);
        info!(session_id = %self.id, "Session reset");
        self.publish();
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Wait for the next external call to finish and apply it. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionOutcome> {
        if self.tracker.outstanding() == 0 {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        let outcome = self.apply(completion);
        self.publish();
        Some(outcome)
    }

    /// Drain completions until nothing is in flight
    pub async fn settle(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn apply(&mut self, completion: Completion) -> CompletionOutcome {
        match completion {
            Completion::Makes { tag, result } => {
                if !self.tracker.complete(tag) {
                    return self.discard(tag);
                }
                self.makes = match result {
                    Ok(makes) => {
                        info!(session_id = %self.id, count = makes.len(), "Makes loaded");
                        makes
                    }
                    Err(err) => {
                        warn!(session_id = %self.id, error = %err, "Make list unavailable");
                        Vec::new()
                    }
                };
                CompletionOutcome::Applied(tag.slot)
            }
            Completion::Models { tag, make, result } => {
                if !self.tracker.complete(tag) || make != self.selection.make() {
                    return self.discard(tag);
                }
                self.models_pending = false;
                match result {
                    Ok(models) => {
                        info!(
                            session_id = %self.id,
                            make = %make,
                            count = models.len(),
                            "Models loaded"
                        );
                        self.model_options = ModelOptions::new(make, models);
                    }
                    Err(err) => {
                        warn!(
                            session_id = %self.id,
                            make = %make,
                            error = %err,
                            "Model list unavailable"
                        );
                        self.model_options.clear();
                        if !self.model_from_lookup {
                            self.selection.set_model(String::new());
                        }
                    }
                }
                CompletionOutcome::Applied(tag.slot)
            }
            Completion::Lookup {
                tag,
                registration,
                result,
            } => {
                if !self.tracker.complete(tag) {
                    return self.discard(tag);
                }
                match result {
                    Ok(response) => self.apply_lookup(&registration, response),
                    Err(err) => {
                        warn!(
                            session_id = %self.id,
                            registration = %registration,
                            error = %err,
                            "Registration lookup failed"
                        );
                        self.lookup = LookupState::failed();
                    }
                }
                CompletionOutcome::Applied(tag.slot)
            }
            Completion::Generation {
                tag,
                request,
                result,
            } => {
                if !self.tracker.complete(tag) {
                    return self.discard(tag);
                }
                // A current tag means no selection edit happened since the request snapshot.
                self.generation = match result {
                    Ok(rendered) => {
                        let summary = PreviewSummary::new(&request, rendered);
                        info!(
                            session_id = %self.id,
                            vehicle = %summary.vehicle_label,
                            wrap = %summary.wrap_label,
                            "Preview generation done"
                        );
                        GenerationState::Done { summary }
                    }
                    Err(err) => {
                        warn!(session_id = %self.id, error = %err, "Preview generation failed");
                        GenerationState::Failed {
                            message: format!("Preview generation failed: {}", err),
                        }
                    }
                };
                CompletionOutcome::Applied(tag.slot)
            }
        }
    }

    fn apply_lookup(&mut self, registration: &str, response: LookupResponse) {
        info!(
            session_id = %self.id,
            registration = %registration,
            make = response.make.as_deref().unwrap_or(""),
            model = response.model.as_deref().unwrap_or(""),
            "Registration resolved"
        );
        if let Some(make) = response.make.filter(|m| !m.is_empty()) {
            if make != self.selection.make() {
                let refresh = self.config.refresh_models_after_lookup;
                self.change_make(make, refresh);
            }
        }
        if let Some(model) = response.model.filter(|m| !m.is_empty()) {
            if self.selection.make().is_empty() {
                debug!(
                    session_id = %self.id,
                    model = %model,
                    "Ignoring resolved model without a make"
                );
            } else {
                self.selection.set_model(model);
                self.model_from_lookup = true;
            }
        }
        self.lookup = LookupState::resolved(response.message);
        self.invalidate_preview();
    }

    fn discard(&self, tag: RequestTag) -> CompletionOutcome {
        debug!(
            session_id = %self.id,
            slot = %tag.slot,
            seq = tag.seq,
            "Discarded superseded completion"
        );
        CompletionOutcome::Discarded(tag.slot)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn change_make(&mut self, make: String, fetch_models: bool) {
        info!(session_id = %self.id, make = %make, "Make selected");
        self.selection.set_make(make.clone());
        self.model_from_lookup = false;
        self.model_options.clear();
        self.invalidate_preview();

        if make.is_empty() || !fetch_models {
            self.tracker.invalidate(Slot::Models);
            self.models_pending = false;
            return;
        }
        self.fetch_models(make);
    }

    /// Issue a models request for `make`, superseding any earlier one
    fn fetch_models(&mut self, make: String) {
        self.models_pending = true;
        let tag = self.tracker.issue(Slot::Models);
        let catalog = self.collaborators.catalog.clone();
        let requested = make.clone();
        self.dispatch(
            async move { catalog.list_models(&requested).await },
            move |result| Completion::Models { tag, make, result },
        );
    }

    /// Any selection edit drops the previous preview and supersedes a pending generation
    fn invalidate_preview(&mut self) {
        if self.generation != GenerationState::Idle {
            debug!(
                session_id = %self.id,
                from = self.generation.as_str(),
                "Preview invalidated"
            );
        }
        self.generation = GenerationState::Idle;
        self.tracker.invalidate(Slot::Generation);
    }

    fn dispatch<T, F, W>(&self, call: F, wrap: W)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ServiceError>> + Send + 'static,
        W: FnOnce(Result<T, ServiceError>) -> Completion + Send + 'static,
    {
        let tx = self.completions_tx.clone();
        let timeout = self.config.request_timeout();
        let call = tokio::spawn(async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ServiceError::Timeout(limit)),
                },
                None => call.await,
            }
        });
        tokio::spawn(async move {
            // A panicking collaborator still owes the session a completion.
            let result = call.await.unwrap_or_else(|e| {
                Err(ServiceError::RequestFailed(format!(
                    "Collaborator task failed: {}",
                    e
                )))
            });
            // The receiver lives as long as the session; a send error means it was dropped.
            let _ = tx.send(wrap(result));
        });
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id.clone(),
            makes: self.makes.clone(),
            model_options: self.model_options.clone(),
            selection: self.selection.clone(),
            registration_input: self.registration_input.clone(),
            lookup: self.lookup.clone(),
            generation: self.generation.clone(),
            ready_to_generate: self.selection.ready_to_generate(),
            readiness_hint: self.selection.readiness_hint(),
            in_flight: self.tracker.outstanding(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn session_id(&self) -> &str {
        &self.id
    }

    pub fn makes(&self) -> &[String] {
        &self.makes
    }

    pub fn models(&self) -> &[String] {
        self.model_options.models()
    }

    pub fn model_options(&self) -> &ModelOptions {
        &self.model_options
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn registration_input(&self) -> &str {
        &self.registration_input
    }

    pub fn lookup_state(&self) -> &LookupState {
        &self.lookup
    }

    pub fn generation(&self) -> &GenerationState {
        &self.generation
    }

    pub fn ready_to_generate(&self) -> bool {
        self.selection.ready_to_generate()
    }

    pub fn readiness_hint(&self) -> &'static str {
        self.selection.readiness_hint()
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.outstanding()
    }
}
