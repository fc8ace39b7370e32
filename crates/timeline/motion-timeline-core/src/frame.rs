//! One discrete sample position of the timeline: field name -> value.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A single frame of motion data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotionFrame {
    values: HashMap<String, f64>,
}

impl MotionFrame {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or `None` when the frame carries no such field.
    #[inline]
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    #[inline]
    pub fn set(&mut self, field: impl Into<String>, value: f64) {
        self.values.insert(field.into(), value);
    }

    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for MotionFrame {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
