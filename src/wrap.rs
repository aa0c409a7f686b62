//! Wrap Catalog
//!
//! Static reference data for the wrap colours a vehicle can be previewed in. Entries are
//! never mutated; the selection holds `&'static` references into [`WRAP_CATALOG`].

use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Surface finish of a wrap film
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finish {
    Gloss,
    Satin,
    Matte,
}

impl Finish {
    pub fn as_str(self) -> &'static str {
        match self {
            Finish::Gloss => "Gloss",
            Finish::Satin => "Satin",
            Finish::Matte => "Matte",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WrapOption {
    /// Unique display name
    pub name: &'static str,
    pub finish: Finish,
    /// `#RRGGBB`
    pub hex: &'static str,
}

impl WrapOption {
    /// Display label, e.g. `Gloss Black (Gloss)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.finish)
    }

    /// Parsed swatch colour.
    ///
    /// Every built-in entry carries a valid hex value; an unparseable value falls back to black.
    pub fn swatch(&self) -> Swatch {
        Swatch::parse(self.hex).unwrap_or_default()
    }
}

/// Built-in wrap palette, in display order.
pub static WRAP_CATALOG: [WrapOption; 7] = [
    WrapOption {
        name: "Gloss Black",
        finish: Finish::Gloss,
        hex: "#0B0D12",
    },
    WrapOption {
        name: "Satin Black",
        finish: Finish::Satin,
        hex: "#12151C",
    },
    WrapOption {
        name: "Matte White",
        finish: Finish::Matte,
        hex: "#F3F4F6",
    },
    WrapOption {
        name: "Nardo Grey",
        finish: Finish::Satin,
        hex: "#8E939A",
    },
    WrapOption {
        name: "Miami Blue",
        finish: Finish::Gloss,
        hex: "#2ED4FF",
    },
    WrapOption {
        name: "Midnight Purple",
        finish: Finish::Gloss,
        hex: "#5B2BD8",
    },
    WrapOption {
        name: "British Racing Green",
        finish: Finish::Satin,
        hex: "#0D3B2E",
    },
];

/// Look up a wrap by its exact display name
pub fn find_wrap(name: &str) -> Result<&'static WrapOption, SelectionError> {
    WRAP_CATALOG
        .iter()
        .find(|wrap| wrap.name == name)
        .ok_or_else(|| SelectionError::UnknownWrap(name.to_string()))
}

/// RGB swatch colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Swatch {
    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 {
            return None;
        }
        let bytes = hex::decode(digits).ok()?;
        Some(Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode_upper([self.r, self.g, self.b]))
    }
}
