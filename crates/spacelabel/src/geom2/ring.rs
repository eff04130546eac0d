use nalgebra::Vector2;

/// Signed shoelace area of the ring (positive for CCW).
///
/// Open and closed rings give the same value. Terms are taken relative to the
/// first vertex: epoch-second `x` values would otherwise cancel catastrophically.
pub fn signed_area(ring: &[Vector2<f64>]) -> f64 {
    let Some(&origin) = ring.first() else {
        return 0.0;
    };
    let n = ring.len();
    let mut acc = 0.0;
    for k in 0..n {
        let a = ring[k] - origin;
        let b = ring[(k + 1) % n] - origin;
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc
}

/// CCW test for the ring interpretation of `ring`. Degenerate (zero-area)
/// rings count as CCW.
#[inline]
pub fn is_ccw(ring: &[Vector2<f64>]) -> bool {
    signed_area(ring) >= 0.0
}

/// First vertex equals last (exact comparison). Needs at least two vertexes.
#[inline]
pub fn is_closed(ring: &[Vector2<f64>]) -> bool {
    ring.len() >= 2 && ring.first() == ring.last()
}

/// Ring without its closing duplicate.
#[inline]
pub fn open_ring(ring: &[Vector2<f64>]) -> &[Vector2<f64>] {
    if is_closed(ring) {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}
