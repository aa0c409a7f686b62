//! CLI route: single route table and run context. Drives a preview session per command.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_list, format_lookup, format_preview, format_wraps, OutputFormat};
use crate::config::{ConfigLoader, WrapviewConfig};
use crate::error::ApiError;
use crate::intake::{ImageFile, IntakeSurface};
use crate::session::{Collaborators, PreviewSession};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: resolved configuration and collaborators.
pub struct RunContext {
    config: WrapviewConfig,
    collaborators: Collaborators,
}

impl RunContext {
    /// Load configuration (explicit file or layered workspace sources) and build collaborators.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        demo: bool,
    ) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        }
        .validated()?;
        Self::from_config(config, demo)
    }

    pub fn from_config(config: WrapviewConfig, demo: bool) -> Result<Self, ApiError> {
        let collaborators = Collaborators::from_config(&config, demo)?;
        Ok(Self {
            config,
            collaborators,
        })
    }

    /// Use explicit collaborators, e.g. fakes in tests
    pub fn with_collaborators(config: WrapviewConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn config(&self) -> &WrapviewConfig {
        &self.config
    }

    fn new_session(&self) -> PreviewSession {
        PreviewSession::new(self.collaborators.clone(), self.config.session.clone())
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Wraps { format } => format_wraps(OutputFormat::parse(format)?),
            Commands::Makes { format } => {
                let format = OutputFormat::parse(format)?;
                let mut session = self.new_session();
                session.initialize();
                session.settle().await;
                format_list("makes", session.makes(), format)
            }
            Commands::Models { make, format } => {
                let format = OutputFormat::parse(format)?;
                let mut session = self.new_session();
                session.select_make(make.as_str());
                session.settle().await;
                format_list("models", session.models(), format)
            }
            Commands::Lookup { registration } => {
                let mut session = self.new_session();
                if !session.lookup(registration.as_str()) {
                    return Err(ApiError::InvalidArgument(
                        "Registration is empty".to_string(),
                    ));
                }
                session.settle().await;
                Ok(format_lookup(&session.snapshot()))
            }
            Commands::Preview {
                make,
                model,
                registration,
                image,
                wrap,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                self.run_preview(
                    make.as_deref(),
                    model.as_deref(),
                    registration.as_deref(),
                    image.as_deref(),
                    wrap.as_deref(),
                    format,
                )
                .await
            }
        }
    }

    async fn run_preview(
        &self,
        make: Option<&str>,
        model: Option<&str>,
        registration: Option<&str>,
        image: Option<&Path>,
        wrap: Option<&str>,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let mut session = self.new_session();
        session.initialize();
        if let Some(registration) = registration {
            session.lookup(registration);
        }
        session.settle().await;

        if let Some(make) = make {
            session.select_make(make);
            session.settle().await;
        }
        if let Some(model) = model {
            session.select_model(model)?;
        }
        if let Some(path) = image {
            let file = ImageFile::from_path(path)?;
            session.accept_image(&file, IntakeSurface::FilePicker)?;
        }
        if let Some(wrap) = wrap {
            session.select_wrap_by_name(wrap)?;
        }

        if session.generate() {
            session.settle().await;
        } else {
            info!(hint = session.readiness_hint(), "Preview not generated");
        }
        format_preview(&session.snapshot(), format)
    }
}
