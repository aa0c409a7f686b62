//! Image Intake
//!
//! Accepts user-supplied vehicle photos and hands out session-scoped references. Nothing is
//! uploaded or transformed; the reference is an opaque local handle.

use crate::error::IntakeError;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Input surface an image arrived through. Both apply identical validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeSurface {
    DragAndDrop,
    FilePicker,
}

impl IntakeSurface {
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeSurface::DragAndDrop => "drag_and_drop",
            IntakeSurface::FilePicker => "file_picker",
        }
    }
}

/// A file-like object as handed over by the caller
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    /// Declared content type, e.g. `image/jpeg`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its content type from the extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            content_type: content_type_for_path(path).to_string(),
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        is_image_content_type(&self.content_type)
    }
}

/// `image/*`, case-insensitive
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("image/"))
        .unwrap_or(false)
}

/// Best-effort content type from a file extension
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Opaque, session-scoped handle to an accepted image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out references of the form `local://<session>/<n>-<digest>`
#[derive(Debug)]
pub struct ImageIntake {
    session_id: String,
    counter: AtomicU64,
}

impl ImageIntake {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            counter: AtomicU64::new(1),
        }
    }

    /// Validate `file` and produce a reference for it
    pub fn accept(
        &self,
        file: &ImageFile,
        surface: IntakeSurface,
    ) -> Result<ImageReference, IntakeError> {
        if !file.is_image() {
            debug!(
                surface = surface.as_str(),
                file = %file.name,
                content_type = %file.content_type,
                "Rejected non-image file"
            );
            return Err(IntakeError::NotAnImage {
                content_type: file.content_type.clone(),
            });
        }

        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let digest = blake3::hash(&file.bytes);
        let short = &digest.to_hex()[..12];
        let reference = ImageReference(format!("local://{}/{}-{}", self.session_id, seq, short));

        info!(
            surface = surface.as_str(),
            file = %file.name,
            bytes = file.bytes.len(),
            reference = %reference,
            "Accepted image"
        );
        Ok(reference)
    }
}
