//! Planar geometry on the (numeric time, frequency) plane.
//!
//! Purpose
//! - Ring orientation (shoelace sign) and clipping of a simple ring against an
//!   axis-aligned box, in plain `f64` coordinates.
//! - Callers outside this module go through `PlanarGeometry` so the clipping
//!   backend can be swapped without touching `Feature`.
//!
//! Conventions
//! - Points are `Vector2<f64>` with `x` = Unix seconds, `y` = frequency.
//! - Rings may be passed open or closed (last == first); results of
//!   `intersect_with_axis_aligned_box` are always closed.

mod clip;
mod ring;
mod types;

pub use clip::{ClipEngine, PlanarGeometry};
pub use ring::{is_ccw, is_closed, open_ring, signed_area};
pub use types::{GeomCfg, Rect2};

#[cfg(test)]
mod tests;
