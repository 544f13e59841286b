//! Player dimensions per device form factor.

use serde::{Deserialize, Serialize};

/// Device class reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFactor {
    #[default]
    Large,
    Medium,
    Small,
    /// Anything the host reports that we don't know about.
    Other,
}

impl FormFactor {
    pub fn from_str(s: &str) -> Self {
        match s {
            "Large" => FormFactor::Large,
            "Medium" => FormFactor::Medium,
            "Small" => FormFactor::Small,
            _ => FormFactor::Other,
        }
    }
}

/// Width/height pair, passed to the view verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl Size {
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }
}

/// Configured sizes for each breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub desktop: Size,
    pub tablet: Size,
    pub mobile: Size,
}

/// Pick the size for a form factor. Unknown devices get the desktop size.
pub fn resolve_dimension(form_factor: FormFactor, sizes: &Breakpoints) -> &Size {
    match form_factor {
        FormFactor::Large => &sizes.desktop,
        FormFactor::Medium => &sizes.tablet,
        FormFactor::Small => &sizes.mobile,
        FormFactor::Other => &sizes.desktop,
    }
}
