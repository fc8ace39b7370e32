//! Keyframe tangent handles.
//!
//! A handle pairs two control points in frame-index space: `in` shapes the
//! curve arriving at the keyframe, `out` the curve leaving it. The x
//! coordinates live on the frame axis; the invariant is
//! `in.x < pos - EPSILON` and `out.x > pos + EPSILON` so a handle can never
//! cross its own keyframe.

use serde::{Deserialize, Serialize};

/// Minimum distance between a handle point and its keyframe on the x axis,
/// and the minimum default handle span.
pub const HANDLE_EPSILON: f64 = 1e-3;

/// One tangent control point in (frame index, value) space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandlePoint {
    pub x: f64,
    pub y: f64,
}

impl HandlePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// How a handle's position is determined.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleType {
    /// Recomputed from neighboring data; not manually authored.
    Auto,
    /// Auto with y clamped to the local value range (no overshoot).
    AutoClamped,
    /// Both sides independently authored.
    Free,
    /// Both sides kept colinear through the keyframe.
    Aligned,
    /// Both sides point straight at the adjacent keyframes (sharp corner).
    Vector,
}

impl HandleType {
    /// Auto-family handles are re-derived whenever neighboring data changes.
    #[inline]
    pub fn is_auto(self) -> bool {
        matches!(self, HandleType::Auto | HandleType::AutoClamped)
    }
}

/// Which side of a keyframe a handle point sits on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleSide {
    In,
    Out,
}

/// A keyframe's pair of tangent control points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    #[serde(rename = "in")]
    pub in_point: HandlePoint,
    #[serde(rename = "out")]
    pub out_point: HandlePoint,
    #[serde(rename = "type")]
    pub handle_type: HandleType,
}

impl Handle {
    #[inline]
    pub fn new(in_point: HandlePoint, out_point: HandlePoint, handle_type: HandleType) -> Self {
        Self {
            in_point,
            out_point,
            handle_type,
        }
    }

    #[inline]
    pub fn point(&self, side: HandleSide) -> HandlePoint {
        match side {
            HandleSide::In => self.in_point,
            HandleSide::Out => self.out_point,
        }
    }

    #[inline]
    pub fn point_mut(&mut self, side: HandleSide) -> &mut HandlePoint {
        match side {
            HandleSide::In => &mut self.in_point,
            HandleSide::Out => &mut self.out_point,
        }
    }

    /// Clamp both x coordinates so neither side crosses the keyframe at `pos`.
    pub fn clamp_to_keyframe(&mut self, pos: usize) {
        let pos = pos as f64;
        if self.in_point.x > pos - HANDLE_EPSILON {
            self.in_point.x = pos - HANDLE_EPSILON;
        }
        if self.out_point.x < pos + HANDLE_EPSILON {
            self.out_point.x = pos + HANDLE_EPSILON;
        }
    }

    /// Mirror `side`'s offset through the keyframe at (`pos`, `value`) onto
    /// the opposite side, keeping both sides colinear.
    pub fn mirror_through(&mut self, pos: usize, value: f64, side: HandleSide) {
        let px = pos as f64;
        let src = self.point(side);
        let (dx, dy) = (src.x - px, src.y - value);
        *self.point_mut(opposite(side)) = HandlePoint::new(px - dx, value - dy);
        self.clamp_to_keyframe(pos);
    }
}

/// The other side of a handle pair.
#[inline]
pub fn opposite(side: HandleSide) -> HandleSide {
    match side {
        HandleSide::In => HandleSide::Out,
        HandleSide::Out => HandleSide::In,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_handles_on_their_side() {
        let mut h = Handle::new(
            HandlePoint::new(5.5, 1.0),
            HandlePoint::new(4.5, 1.0),
            HandleType::Free,
        );
        h.clamp_to_keyframe(5);
        assert!(h.in_point.x < 5.0);
        assert!(h.out_point.x > 5.0);
    }

    #[test]
    fn mirror_negates_offsets() {
        let mut h = Handle::new(
            HandlePoint::new(4.0, 0.0),
            HandlePoint::new(6.0, 3.0),
            HandleType::Aligned,
        );
        h.mirror_through(5, 1.0, HandleSide::Out);
        assert_eq!(h.in_point, HandlePoint::new(4.0, -1.0));
    }
}
