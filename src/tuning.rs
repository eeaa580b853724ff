//! Data-driven physics constants
//!
//! Defaults reproduce the classic feel. Overrides come from JSON (missing
//! fields fall back to the defaults).

use serde::{Deserialize, Serialize};

use crate::consts::{FRICTION, GRAVITY, LINE_FRICTION};
use crate::error::DoodleError;

/// Per-tick physics parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration added to vy each tick (balls and finished lines)
    pub gravity: f32,
    /// Velocity multiplier applied each tick, in (0, 1]
    pub friction: f32,
    /// Along-segment speed multiplier after a line contact
    pub line_friction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            friction: FRICTION,
            line_friction: LINE_FRICTION,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, DoodleError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make the simulation blow up
    pub fn validate(&self) -> Result<(), DoodleError> {
        if !self.gravity.is_finite() {
            return Err(DoodleError::InvalidTuning {
                field: "gravity",
                value: self.gravity,
            });
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(DoodleError::InvalidTuning {
                field: "friction",
                value: self.friction,
            });
        }
        if !(self.line_friction.is_finite() && self.line_friction > 0.0) {
            return Err(DoodleError::InvalidTuning {
                field: "line_friction",
                value: self.line_friction,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.gravity, 2.0);
        assert_eq!(t.friction, 0.9);
        assert_eq!(t.line_friction, 3.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = Tuning::from_json(r#"{ "gravity": 1.0 }"#).unwrap();
        assert_eq!(t.gravity, 1.0);
        assert_eq!(t.friction, FRICTION);
    }

    #[test]
    fn test_rejects_bad_friction() {
        let err = Tuning::from_json(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            DoodleError::InvalidTuning {
                field: "friction",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ gravity"),
            Err(DoodleError::Parse(_))
        ));
    }
}
