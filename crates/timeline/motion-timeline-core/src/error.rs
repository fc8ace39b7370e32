//! Error types for the timeline core.
//!
//! The error surface is deliberately narrow: out-of-range positions and
//! missing per-frame fields are not errors (they no-op or return `None`),
//! since UI gestures routinely race against frame-count changes. Errors are
//! reserved for loading and serialization, where the caller handed us
//! something structurally unusable.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TimelineError {
    /// Motion data must contain at least one frame.
    #[error("motion data must contain at least one frame")]
    EmptyMotion,

    /// A named field is not part of the loaded track set.
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    /// Serialization / parse failure.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let err = TimelineError::UnknownField {
            field: "j_x".into(),
        };
        let s = serde_json::to_string(&err).unwrap();
        let back: TimelineError = serde_json::from_str(&s).unwrap();
        assert_eq!(err, back);
    }

    #[test]
    fn display_names_the_field() {
        let err = TimelineError::UnknownField {
            field: "j_x".into(),
        };
        assert!(err.to_string().contains("j_x"));
    }
}
