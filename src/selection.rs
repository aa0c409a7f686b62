//! Selection State
//!
//! The single source of truth for what is being previewed. Fields are only written by the
//! session's named operations; readers get the derived readiness and vehicle identity.

use crate::intake::ImageReference;
use crate::wrap::WrapOption;
use serde::Serialize;

pub const READY_HINT: &str = "Ready to preview.";
pub const NOT_READY_HINT: &str = "To preview: upload a photo (or select make/model) + choose a wrap.";

/// Label used for an image-based vehicle identity
pub const UPLOADED_PHOTO_LABEL: &str = "Uploaded photo";

/// Where the previewed vehicle comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VehicleIdentity {
    Image { reference: ImageReference },
    Catalog { make: String, model: String },
}

impl VehicleIdentity {
    pub fn label(&self) -> String {
        match self {
            VehicleIdentity::Image { .. } => UPLOADED_PHOTO_LABEL.to_string(),
            VehicleIdentity::Catalog { make, model } => format!("{} {}", make, model),
        }
    }
}

/// Current configuration. Empty strings mean "unselected".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    make: String,
    model: String,
    wrap: Option<&'static WrapOption>,
    image: Option<ImageReference>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn wrap(&self) -> Option<&'static WrapOption> {
        self.wrap
    }

    pub fn image(&self) -> Option<&ImageReference> {
        self.image.as_ref()
    }

    /// Photo present, or both make and model present
    pub fn has_vehicle(&self) -> bool {
        self.image.is_some() || (!self.make.is_empty() && !self.model.is_empty())
    }

    pub fn ready_to_generate(&self) -> bool {
        self.has_vehicle() && self.wrap.is_some()
    }

    pub fn readiness_hint(&self) -> &'static str {
        if self.ready_to_generate() {
            READY_HINT
        } else {
            NOT_READY_HINT
        }
    }

    /// Vehicle identity; the photo takes precedence over make/model
    pub fn vehicle(&self) -> Option<VehicleIdentity> {
        if let Some(reference) = &self.image {
            return Some(VehicleIdentity::Image {
                reference: reference.clone(),
            });
        }
        if self.make.is_empty() || self.model.is_empty() {
            return None;
        }
        Some(VehicleIdentity::Catalog {
            make: self.make.clone(),
            model: self.model.clone(),
        })
    }

    /// Set the make; any model chosen under the previous make is dropped
    pub(crate) fn set_make(&mut self, make: String) {
        self.make = make;
        self.model.clear();
    }

    pub(crate) fn set_model(&mut self, model: String) {
        self.model = model;
    }

    pub(crate) fn set_wrap(&mut self, wrap: Option<&'static WrapOption>) {
        self.wrap = wrap;
    }

    pub(crate) fn set_image(&mut self, image: ImageReference) {
        self.image = Some(image);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
