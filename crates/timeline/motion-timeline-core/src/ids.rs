//! Frame identity tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TimelineError;

/// Opaque, globally unique identity of a logical frame.
///
/// A `FrameId` is minted once per logical frame and never reused. It keeps
/// denoting the same logical frame across inserts/deletes/moves; the current
/// array position is looked up through [`crate::index::FrameIndex`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(Uuid);

impl FrameId {
    /// Mint a fresh id.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form (e.g. from a serialized log).
    pub fn from_string(s: impl AsRef<str>) -> Result<Self, TimelineError> {
        Uuid::parse_str(s.as_ref())
            .map(Self)
            .map_err(|e| TimelineError::Serialization {
                reason: format!("invalid frame id: {e}"),
            })
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = FrameId::new();
        let b = FrameId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn string_roundtrip() {
        let id = FrameId::new();
        let parsed = FrameId::from_string(id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn from_string_rejects_garbage() {
        assert!(FrameId::from_string("not-a-uuid").is_err());
    }
}
