//! Pure curve math: Hermite segment evaluation and auto-tangent derivation.
//!
//! Keyframes sit on integer frame positions; a segment between two keyframes
//! is a cubic Hermite whose end tangents are the slopes implied by the start
//! keyframe's `out` handle and the end keyframe's `in` handle.

use crate::handle::{Handle, HandlePoint, HandleType, HANDLE_EPSILON};

/// Cubic Hermite basis evaluation on a unit interval.
/// `m0`/`m1` are tangents already scaled by the segment length.
#[inline]
pub fn hermite(v0: f64, m0: f64, v1: f64, m1: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * v0 + h10 * m0 + h01 * v1 + h11 * m1
}

/// Slope implied by a handle point relative to its keyframe at (`pos`, `value`).
/// The x distance is never smaller than epsilon by the handle invariant, but
/// guard anyway so a degenerate point cannot produce infinities.
#[inline]
pub fn handle_slope(pos: f64, value: f64, point: HandlePoint) -> f64 {
    let dx = point.x - pos;
    if dx.abs() < HANDLE_EPSILON {
        0.0
    } else {
        (point.y - value) / dx
    }
}

/// Neighborhood used to derive an auto handle for the keyframe at `pos`.
#[derive(Clone, Copy, Debug)]
pub struct AutoContext {
    /// Keyframe position and raw value being computed for.
    pub pos: usize,
    pub value: f64,
    /// Nearest keyframe neighbor on each side: (position, value).
    pub prev_key: Option<(usize, f64)>,
    pub next_key: Option<(usize, f64)>,
    /// Raw samples immediately adjacent to `pos` (any frame, keyframe or not).
    pub prev_sample: Option<f64>,
    pub next_sample: Option<f64>,
}

/// Tangent slope estimate for an auto handle.
///
/// Preference order:
/// 1. central difference of the raw samples at pos-1/pos+1 (captures the
///    originally recorded curve shape, not just the keyframe secant),
/// 2. keyframe-to-keyframe secant,
/// 3. one-sided difference against the single existing neighbor,
/// 4. zero for an isolated keyframe.
pub fn auto_slope(ctx: &AutoContext) -> f64 {
    if let (Some(prev), Some(next)) = (ctx.prev_sample, ctx.next_sample) {
        return (next - prev) / 2.0;
    }
    match (ctx.prev_key, ctx.next_key) {
        (Some((p0, v0)), Some((p1, v1))) => {
            let dx = (p1 - p0) as f64;
            if dx > 0.0 {
                (v1 - v0) / dx
            } else {
                0.0
            }
        }
        (Some((p0, v0)), None) => {
            let dx = (ctx.pos - p0) as f64;
            if dx > 0.0 {
                (ctx.value - v0) / dx
            } else {
                0.0
            }
        }
        (None, Some((p1, v1))) => {
            let dx = (p1 - ctx.pos) as f64;
            if dx > 0.0 {
                (v1 - ctx.value) / dx
            } else {
                0.0
            }
        }
        (None, None) => 0.0,
    }
}

/// Compute a full auto handle: slope from [`auto_slope`], span one third of
/// the distance to each neighbor (min epsilon), and for `AutoClamped` each
/// side's y clamped to the range spanned by the keyframe and that neighbor.
pub fn compute_auto_handle(ctx: &AutoContext, handle_type: HandleType) -> Handle {
    let slope = auto_slope(ctx);
    let px = ctx.pos as f64;

    let span_left = ctx
        .prev_key
        .map(|(p, _)| (ctx.pos - p) as f64 / 3.0)
        .unwrap_or(1.0 / 3.0)
        .max(HANDLE_EPSILON);
    let span_right = ctx
        .next_key
        .map(|(p, _)| (p - ctx.pos) as f64 / 3.0)
        .unwrap_or(1.0 / 3.0)
        .max(HANDLE_EPSILON);

    let mut in_point = HandlePoint::new(px - span_left, ctx.value - slope * span_left);
    let mut out_point = HandlePoint::new(px + span_right, ctx.value + slope * span_right);

    if handle_type == HandleType::AutoClamped {
        if let Some((_, v_prev)) = ctx.prev_key {
            let lo = ctx.value.min(v_prev);
            let hi = ctx.value.max(v_prev);
            in_point.y = in_point.y.clamp(lo, hi);
        }
        if let Some((_, v_next)) = ctx.next_key {
            let lo = ctx.value.min(v_next);
            let hi = ctx.value.max(v_next);
            out_point.y = out_point.y.clamp(lo, hi);
        }
    }

    Handle::new(in_point, out_point, handle_type)
}

/// Sample every integer position strictly between two keyframes.
///
/// `start`/`end` are keyframe positions; `v0`/`v1` their values; `h0`/`h1`
/// their handles. Returns `(position, value)` pairs; empty when the segment
/// spans one frame or less.
pub fn sample_segment(
    start: usize,
    end: usize,
    v0: f64,
    v1: f64,
    h0: &Handle,
    h1: &Handle,
) -> Vec<(usize, f64)> {
    if end <= start + 1 {
        return Vec::new();
    }
    let d = (end - start) as f64;
    let m0 = handle_slope(start as f64, v0, h0.out_point) * d;
    let m1 = handle_slope(end as f64, v1, h1.in_point) * d;

    let mut out = Vec::with_capacity(end - start - 1);
    for pos in (start + 1)..end {
        let t = (pos - start) as f64 / d;
        out.push((pos, hermite(v0, m0, v1, m1, t)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_handle(pos: usize, value: f64) -> Handle {
        Handle::new(
            HandlePoint::new(pos as f64 - 1.0, value),
            HandlePoint::new(pos as f64 + 1.0, value),
            HandleType::Auto,
        )
    }

    #[test]
    fn hermite_endpoints() {
        assert_eq!(hermite(1.0, 0.5, 3.0, -0.25, 0.0), 1.0);
        assert_eq!(hermite(1.0, 0.5, 3.0, -0.25, 1.0), 3.0);
    }

    #[test]
    fn zero_tangent_midpoint_is_average() {
        let mid = hermite(0.0, 0.0, 2.0, 0.0, 0.5);
        assert!((mid - 1.0).abs() < 1e-12);
    }

    #[test]
    fn segment_of_length_one_is_empty() {
        let h = flat_handle(0, 0.0);
        let h2 = flat_handle(1, 1.0);
        assert!(sample_segment(0, 1, 0.0, 1.0, &h, &h2).is_empty());
    }

    #[test]
    fn auto_slope_prefers_central_difference() {
        let ctx = AutoContext {
            pos: 5,
            value: 1.0,
            prev_key: Some((0, 0.0)),
            next_key: Some((10, 0.0)),
            prev_sample: Some(0.0),
            next_sample: Some(4.0),
        };
        assert_eq!(auto_slope(&ctx), 2.0);
    }

    #[test]
    fn auto_slope_isolated_keyframe_is_flat() {
        let ctx = AutoContext {
            pos: 0,
            value: 7.0,
            prev_key: None,
            next_key: None,
            prev_sample: None,
            next_sample: None,
        };
        assert_eq!(auto_slope(&ctx), 0.0);
    }

    #[test]
    fn auto_clamped_never_overshoots() {
        // Steep central difference would overshoot the local range.
        let ctx = AutoContext {
            pos: 3,
            value: 1.0,
            prev_key: Some((0, 0.0)),
            next_key: Some((6, 1.1)),
            prev_sample: Some(-5.0),
            next_sample: Some(5.0),
        };
        let h = compute_auto_handle(&ctx, HandleType::AutoClamped);
        assert!(h.in_point.y >= 0.0 && h.in_point.y <= 1.0);
        assert!(h.out_point.y >= 1.0 && h.out_point.y <= 1.1);
    }
}
