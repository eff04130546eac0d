//! Sutherland–Hodgman clipping against an axis-aligned box.
//!
//! The box is convex, so clipping the ring successively against its four
//! edges yields the intersection for any simple subject ring. A non-convex
//! ring whose intersection is disconnected comes back as one ring joined by
//! zero-width bridges along the box boundary.

use nalgebra::Vector2;

use super::ring::{open_ring, signed_area};
use super::types::{GeomCfg, Rect2};

/// Geometry backend used by `Feature`.
pub trait PlanarGeometry {
    fn is_counter_clockwise(&self, ring: &[Vector2<f64>]) -> bool;

    /// Closed exterior ring of `ring ∩ window`, or `None` if the intersection
    /// has no area.
    fn intersect_with_axis_aligned_box(
        &self,
        ring: &[Vector2<f64>],
        window: &Rect2,
    ) -> Option<Vec<Vector2<f64>>>;
}

/// Default backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipEngine {
    pub cfg: GeomCfg,
}

impl ClipEngine {
    #[inline]
    pub fn new(cfg: GeomCfg) -> Self {
        Self { cfg }
    }
}

#[derive(Clone, Copy)]
enum Keep {
    AtLeast,
    AtMost,
}

impl PlanarGeometry for ClipEngine {
    #[inline]
    fn is_counter_clockwise(&self, ring: &[Vector2<f64>]) -> bool {
        super::ring::is_ccw(ring)
    }

    fn intersect_with_axis_aligned_box(
        &self,
        ring: &[Vector2<f64>],
        window: &Rect2,
    ) -> Option<Vec<Vector2<f64>>> {
        let subject = open_ring(ring);
        if subject.len() < 3 {
            return None;
        }
        let eps = self.cfg.eps_clip;
        let mut out = subject.to_vec();
        for (axis, bound, keep) in [
            (0, window.min.x, Keep::AtLeast),
            (1, window.min.y, Keep::AtLeast),
            (0, window.max.x, Keep::AtMost),
            (1, window.max.y, Keep::AtMost),
        ] {
            out = clip_against(&out, axis, bound, keep, eps);
            if out.is_empty() {
                return None;
            }
        }
        dedup_ring(&mut out, self.cfg.eps_dup);
        if out.len() < 3 || signed_area(&out) == 0.0 {
            return None;
        }
        out.push(out[0]);
        Some(out)
    }
}

fn clip_against(
    ring: &[Vector2<f64>],
    axis: usize,
    bound: f64,
    keep: Keep,
    eps: f64,
) -> Vec<Vector2<f64>> {
    let inside = |p: &Vector2<f64>| match keep {
        Keep::AtLeast => p[axis] >= bound - eps,
        Keep::AtMost => p[axis] <= bound + eps,
    };
    let n = ring.len();
    let mut out = Vec::with_capacity(n + 4);
    for k in 0..n {
        let prev = ring[(k + n - 1) % n];
        let cur = ring[k];
        match (inside(&prev), inside(&cur)) {
            (true, true) => out.push(cur),
            (false, true) => {
                out.push(crossing(prev, cur, axis, bound));
                out.push(cur);
            }
            (true, false) => out.push(crossing(prev, cur, axis, bound)),
            (false, false) => {}
        }
    }
    out
}

/// Point where segment `p→q` meets the line `coord[axis] == bound`.
///
/// `p` and `q` differ on `axis` (one passes the inside test, one fails it).
/// `t` is clamped to the segment: a vertex kept by the `eps` slack may sit just past
/// the line.
#[inline]
fn crossing(p: Vector2<f64>, q: Vector2<f64>, axis: usize, bound: f64) -> Vector2<f64> {
    let t = ((bound - p[axis]) / (q[axis] - p[axis])).clamp(0.0, 1.0);
    let mut r = p + (q - p) * t;
    r[axis] = bound;
    r
}

/// Drop consecutive near-duplicates, including across the wrap.
fn dedup_ring(ring: &mut Vec<Vector2<f64>>, eps: f64) {
    ring.dedup_by(|b, a| (*a - *b).norm() <= eps);
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= eps {
        ring.pop();
    }
}
