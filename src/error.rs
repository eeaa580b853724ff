//! Error types for configuration and platform setup.

use core::fmt;

/// Errors surfaced while loading configuration or wiring up the page.
#[derive(Debug)]
pub enum DoodleError {
    /// Configuration JSON could not be parsed.
    Parse(serde_json::Error),
    /// A tuning value is outside its valid range.
    InvalidTuning { field: &'static str, value: f32 },
    /// A required DOM element is missing or has the wrong type.
    MissingElement(&'static str),
    /// The background image could not be decoded into pixels.
    Image(String),
    /// No usable GPU surface, adapter or device.
    Graphics(String),
}

impl fmt::Display for DoodleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoodleError::Parse(e) => write!(f, "invalid configuration: {}", e),
            DoodleError::InvalidTuning { field, value } => {
                write!(f, "tuning value {} = {} is out of range", field, value)
            }
            DoodleError::MissingElement(id) => write!(f, "missing page element #{}", id),
            DoodleError::Image(msg) => write!(f, "background image unavailable: {}", msg),
            DoodleError::Graphics(msg) => write!(f, "graphics setup failed: {}", msg),
        }
    }
}

impl std::error::Error for DoodleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DoodleError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DoodleError {
    fn from(e: serde_json::Error) -> Self {
        DoodleError::Parse(e)
    }
}
