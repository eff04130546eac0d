//! Time-frequency feature geometry for radio spectrogram labelling.
//!
//! A `Feature` is a labelled polygon or polyline on the (time, frequency)
//! plane. This crate keeps its geometry in numeric space (Unix seconds ×
//! frequency), normalizes winding, crops it to a viewing window, and maps it
//! to and from the TFCat interchange schema.
//!
//! Layout
//! - `calendar`: UTC `CalendarTime` and its Unix-seconds conversion.
//! - `crs`: the TFCat CRS document and numeric → calendar mapping.
//! - `geom2`: ring orientation and axis-aligned clipping.
//! - `feature`: `Feature`, `TimeFrequencyBox`, `FeatureError`.
//! - `tfcat`: serde types for TFCat features and collections.
//! - `catalogue`: a set of features under one CRS, with collection I/O.

pub mod calendar;
pub mod catalogue;
pub mod crs;
pub mod feature;
pub mod geom2;
pub mod tfcat;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use calendar::CalendarTime;
pub use nalgebra::Vector2 as Vec2;

/// Common exports for callers.
pub mod prelude {
    pub use crate::calendar::{CalendarTime, TimeError};
    pub use crate::catalogue::{Catalogue, CatalogueError};
    pub use crate::crs::{Crs, CrsError};
    pub use crate::feature::{Feature, FeatureError, TimeFrequencyBox};
    pub use crate::geom2::{ClipEngine, GeomCfg, PlanarGeometry, Rect2};
    pub use crate::tfcat::{FeatureCollection, Geometry, GeometryKind, TfcatFeature};
}
