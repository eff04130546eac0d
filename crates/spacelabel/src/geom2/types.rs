//! Tolerances and the axis-aligned box used for clipping.

use nalgebra::Vector2;

/// Geometry configuration (tolerances).
///
/// Coordinates are Unix seconds (~1e9) on `x`, so `f64` spacing there is
/// ~2e-7; `eps_clip` must sit above that to keep boundary points stable
/// across a calendar round-trip.
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Slack for the inclusive inside test against a box edge.
    pub eps_clip: f64,
    /// Consecutive vertexes closer than this are merged.
    pub eps_dup: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_clip: 1e-6,
            eps_dup: 1e-9,
        }
    }
}

/// Closed axis-aligned box `min <= p <= max` (componentwise).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect2 {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Rect2 {
    #[inline]
    pub fn new(min: Vector2<f64>, max: Vector2<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points; `None` for an empty slice.
    pub fn bounding(points: &[Vector2<f64>]) -> Option<Self> {
        let first = *points.first()?;
        let mut r = Self::new(first, first);
        for p in &points[1..] {
            r.min = r.min.inf(p);
            r.max = r.max.sup(p);
        }
        Some(r)
    }

    #[inline]
    pub fn contains(&self, p: Vector2<f64>) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
